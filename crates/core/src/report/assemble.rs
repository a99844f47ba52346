use crate::curation::rules::{DigestRules, ThemeRules};
use crate::domain::brief::{Brief, Digest, SynthesisPayload};
use crate::domain::language::Language;
use crate::report::prompts;
use crate::report::translate::split_references;
use crate::report::SOURCES_HEADER;
use crate::time::period::ReportPeriod;

#[derive(Debug, Clone)]
pub struct BriefAssembler<'a> {
    themes: &'a ThemeRules,
    limits: &'a DigestRules,
}

impl<'a> BriefAssembler<'a> {
    pub fn new(themes: &'a ThemeRules, limits: &'a DigestRules) -> Self {
        Self { themes, limits }
    }

    pub fn assemble(
        &self,
        digest: Digest,
        market_narrative: String,
        language: Language,
        period: ReportPeriod,
    ) -> Brief {
        let theme_block = self.render_themes(&digest);
        let reference_block = digest.reference_block();
        let payload = SynthesisPayload {
            system: prompts::newsletter_system_prompt(),
            user: prompts::newsletter_user_prompt(
                &period,
                &market_narrative,
                &theme_block,
                digest.survivors().len(),
            ),
        };

        Brief {
            period,
            market_narrative,
            theme_digest: digest,
            theme_block,
            reference_block,
            language,
            payload,
        }
    }

    // Each record appears once, under its primary theme.
    pub fn render_themes(&self, digest: &Digest) -> String {
        let mut lines: Vec<String> = Vec::new();

        for name in self.themes.ordered_names() {
            let entries: Vec<_> = digest
                .placed(name)
                .iter()
                .filter_map(|ranked| digest.survivors().get(ranked.index))
                .take(self.limits.max_records_per_theme_in_brief)
                .collect();
            if entries.is_empty() {
                continue;
            }

            let label = self.themes.label_for(name).unwrap_or(name);
            lines.push(format!("\n{label}:"));
            for record in entries {
                lines.push(format!("• {}", record.title));
                if !record.teaser.is_empty() {
                    lines.push(format!("  Summary: {}", record.teaser));
                }
                if !record.source_url.is_empty() {
                    lines.push(format!("  Source: {}", record.source_url));
                }
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }
}

impl Brief {
    pub fn attach_references(&self, synthesized: &str) -> String {
        let (main, _) = split_references(synthesized);
        format!(
            "{}\n\n{SOURCES_HEADER}\n{}",
            main.trim_end(),
            self.reference_block
        )
    }
}
