use crate::domain::language::Language;
use crate::time::period::ReportPeriod;

const WORD_TARGET: &str = "~1000-1200 words";

pub fn newsletter_system_prompt() -> String {
    [
        "You are a senior financial journalist writing for institutional investors and high-net-worth individuals.",
        "",
        "WRITING STYLE:",
        "- Write flowing, engaging narratives that connect market events naturally",
        "- Use professional but accessible language",
        "- Connect related developments into coherent stories and focus on implications and context",
        "- Write section headers with relevant emojis",
        "- Balance global coverage; do not over-focus on one region unless the data warrants it",
        "",
        "NO TRADING ADVICE:",
        "- Do NOT give buy, sell or hold recommendations for any stock, currency or asset",
        "- Do NOT suggest trading strategies, price predictions or targets",
        "- Report developments and their potential implications, not actionable advice",
        "- Prefer \"developments suggest\" or \"market participants are watching\" over \"investors should\"",
        "",
        "FACTUAL BOUNDARIES:",
        "- Use only companies and data points present in the source material",
        "- Mark connections you draw as analysis rather than stated fact",
        "- Do not invent numbers, percentages or quotes",
    ]
    .join("\n")
}

pub fn newsletter_user_prompt(
    period: &ReportPeriod,
    market_narrative: &str,
    theme_block: &str,
    total_articles: usize,
) -> String {
    let label = period.label();
    let days = period.trading_days();
    format!(
        "Create a professional market newsletter for the period {label} ({days} trading days).\n\n\
MARKET PERFORMANCE:\n{market_narrative}\n\n\
KEY DEVELOPMENTS BY THEME (with source URLs for reference):\n{theme_block}\n\n\
TOTAL ARTICLES ANALYZED: {total_articles}\n\n\
---\n\
NEWSLETTER STRUCTURE:\n\n\
# Market Insights: {label}\n\n\
## 📊 Executive Summary\n\
[2-3 paragraphs capturing the period's dominant themes and why they matter.]\n\n\
## 📈 Market Performance Review\n\
[Best and worst performers and what drove them, as flowing narrative.]\n\n\
## 💼 Corporate & Earnings Developments\n\
[Corporate and earnings stories, grouped, with broader implications.]\n\n\
## 🏛️ Policy & Economic Updates\n\
[Central bank news, policy changes and economic data.]\n\n\
## 🌏 Global Market Themes\n\
[Other significant themes such as Asia-Pacific or technology. Only if there is substantial content.]\n\n\
## 🔮 Looking Ahead\n\
[What to watch, grounded in the themes above.]\n\n\
WRITING GUIDELINES:\n\
- Use specific data points from the market performance section\n\
- Write in paragraphs, not bullet points\n\
- Do NOT include source URLs in the narrative\n\
- Do NOT write a Sources or References section; the numbered source list is appended separately\n\
- Target {WORD_TARGET}"
    )
}

pub fn translation_system_prompt(target: Language) -> String {
    format!(
        "You are a professional financial translator specializing in institutional market research. \
Translate this market newsletter to {target} following these rules:\n\n\
PRESERVE EXACTLY:\n\
1. Company and brand names in English (Apple, Microsoft, Alibaba, Tesla, ...)\n\
2. Market index names in English (S&P 500, NASDAQ, Hang Seng, Nikkei 225, ...)\n\
3. Currency symbols and amounts (USD, $, ...)\n\
4. Percentages and all numeric figures as written\n\
5. Proper nouns and financial terms that stay in English in professional usage\n\
6. Markdown structure (#, ##, **, bullets) with headers and emojis in place\n\n\
TRANSLATE:\n\
7. Narrative prose, analysis and commentary, naturally for native readers\n\
8. Keep the institutional tone\n\n\
Return only the translated newsletter."
    )
}
