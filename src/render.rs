// src/render.rs
use html_escape::encode_safe;

use crate::classify::TierGroups;
use crate::models::{IdeaRecord, Tier};

pub const REPORT_TITLE: &str = "Trending Topics Product Idea Report";
pub const DATA_SOURCE: &str = "Weibo hot search list (TianAPI)";

/// Everything the report shows besides the ideas themselves.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Display time, already formatted.
    pub generated_at: String,
    pub model: String,
    pub topic_count: usize,
}

fn tier_heading(tier: Tier) -> String {
    let icon = match tier {
        Tier::Excellent => "🌟",
        Tier::Good => "👍",
        Tier::Normal => "📝",
    };
    format!("{} {} ideas ({} points)", icon, tier.label(), tier.range_caption())
}

fn bar_width(value: u32, max: u32) -> u32 {
    if max == 0 {
        return 0;
    }
    value.min(max) * 100 / max
}

fn render_card(idea: &IdeaRecord) -> String {
    let class = idea.tier.css_class();
    let total = idea
        .scores
        .total
        .map_or_else(|| "–".to_string(), |t| t.to_string());

    let mut card = String::with_capacity(2048);
    card.push_str(&format!("<article class=\"idea-card {}\">\n", class));

    card.push_str("<div class=\"card-header\">\n");
    card.push_str(&format!("<span class=\"hot-topic\">🔥 {}</span>\n", encode_safe(&idea.topic)));
    card.push_str(&format!("<span class=\"score-badge\">{} pts</span>\n", total));
    card.push_str("</div>\n");

    card.push_str("<div class=\"card-body\">\n");
    card.push_str(&format!("<h3 class=\"idea-name\">{}</h3>\n", encode_safe(&idea.product_name)));

    if !idea.timeline.is_empty() {
        card.push_str("<div class=\"event-timeline\">\n<h4>📰 Event timeline</h4>\n<ul>\n");
        for point in &idea.timeline {
            card.push_str(&format!("<li>{}</li>\n", encode_safe(point)));
        }
        card.push_str("</ul>\n</div>\n");
    }

    card.push_str("<div class=\"idea-details\">\n");
    card.push_str(&format!(
        "<h4>💡 Core function</h4>\n<p>{}</p>\n",
        encode_safe(&idea.core_function)
    ));
    card.push_str(&format!(
        "<h4>👥 Target users</h4>\n<p>{}</p>\n",
        encode_safe(&idea.target_users)
    ));
    card.push_str("</div>\n");

    card.push_str("<div class=\"score-breakdown\">\n<h4>📊 Score breakdown</h4>\n");
    for (label, value, max) in idea.scores.rows() {
        card.push_str(&format!(
            "<div class=\"score-bar\"><span>{}</span><div class=\"bar\"><div class=\"fill\" style=\"width: {}%\"></div></div><span>{}/{}</span></div>\n",
            label,
            bar_width(value, max),
            value,
            max
        ));
    }
    card.push_str(&format!(
        "<div class=\"total-score\"><span>Overall</span><span>{}/100 <span class=\"grade-label\">{}</span></span></div>\n",
        total,
        idea.tier.label()
    ));
    card.push_str("</div>\n</div>\n</article>\n");

    card
}

/// Render the grouped ideas as one self-contained HTML page.
pub fn render_report(groups: &TierGroups<'_>, meta: &ReportMeta) -> String {
    let mut html = String::with_capacity(16384);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", REPORT_TITLE));
    html.push_str("<style>\n");
    html.push_str(INLINE_CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>🔥 {}</h1>\n", REPORT_TITLE));
    html.push_str(&format!(
        "<p class=\"report-date\">Generated: {}</p>\n",
        encode_safe(&meta.generated_at)
    ));
    html.push_str(&format!(
        "<p class=\"summary\">Analyzed {} trending topics, produced {} product ideas</p>\n",
        meta.topic_count,
        groups.total()
    ));
    html.push_str("<div class=\"stats-bar\">\n");
    for tier in Tier::ALL {
        html.push_str(&format!(
            "<div class=\"stat-item\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">{} ideas</div></div>\n",
            groups.count(tier),
            tier.label()
        ));
    }
    html.push_str("</div>\n</header>\n");

    // Tier sections
    html.push_str("<main>\n");
    for (tier, ideas) in groups.iter() {
        html.push_str(&format!("<section class=\"{}-ideas\">\n", tier.css_class()));
        html.push_str(&format!("<h2>{}</h2>\n", tier_heading(tier)));
        html.push_str("<div class=\"ideas-grid\">\n");
        for idea in ideas {
            html.push_str(&render_card(idea));
        }
        html.push_str("</div>\n</section>\n");
    }
    html.push_str("</main>\n");

    // Footer
    html.push_str("<footer>\n");
    html.push_str(&format!(
        "<p>Generated automatically by {} on a scheduled job</p>\n",
        encode_safe(&meta.model)
    ));
    html.push_str(&format!("<p>Data source: {}</p>\n", DATA_SOURCE));
    html.push_str("</footer>\n</body>\n</html>\n");

    html
}

const INLINE_CSS: &str = r#":root {
  --excellent-color: #10b981; --excellent-bg: #ecfdf5;
  --good-color: #3b82f6; --good-bg: #eff6ff;
  --normal-color: #6b7280; --normal-bg: #f9fafb;
  --text-primary: #1f2937; --text-secondary: #6b7280;
  --bg-main: #f3f4f6; --card-shadow: 0 4px 6px -1px rgba(0, 0, 0, 0.1);
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: var(--bg-main); color: var(--text-primary); line-height: 1.6; }
header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 3rem 2rem; text-align: center; }
header h1 { font-size: 2.5rem; margin-bottom: 1rem; }
.report-date { font-size: 1rem; opacity: 0.9; }
.summary { margin-top: 1rem; font-size: 1.1rem; background: rgba(255,255,255,0.2); display: inline-block; padding: 0.5rem 1.5rem; border-radius: 2rem; }
.stats-bar { display: flex; justify-content: center; gap: 2rem; margin-top: 1.5rem; flex-wrap: wrap; }
.stat-item { background: rgba(255,255,255,0.15); padding: 0.75rem 1.5rem; border-radius: 0.5rem; }
.stat-value { font-size: 1.5rem; font-weight: bold; }
.stat-label { font-size: 0.85rem; opacity: 0.9; }
main { max-width: 1200px; margin: 0 auto; padding: 2rem; }
section { margin-bottom: 3rem; }
section h2 { font-size: 1.5rem; margin-bottom: 1.5rem; padding-bottom: 0.5rem; border-bottom: 3px solid var(--excellent-color); }
.excellent-ideas h2 { border-color: var(--excellent-color); }
.good-ideas h2 { border-color: var(--good-color); }
.normal-ideas h2 { border-color: var(--normal-color); }
.ideas-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(350px, 1fr)); gap: 1.5rem; }
.idea-card { background: white; border-radius: 1rem; overflow: hidden; box-shadow: var(--card-shadow); transition: transform 0.3s ease; }
.idea-card:hover { transform: translateY(-5px); }
.idea-card.excellent { border-top: 4px solid var(--excellent-color); }
.idea-card.good { border-top: 4px solid var(--good-color); }
.idea-card.normal { border-top: 4px solid var(--normal-color); }
.card-header { padding: 1rem 1.5rem; display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid #e5e7eb; }
.hot-topic { font-size: 0.85rem; color: #ef4444; font-weight: 500; }
.score-badge { font-weight: bold; padding: 0.25rem 0.75rem; border-radius: 1rem; font-size: 0.9rem; }
.excellent .score-badge, .excellent .grade-label { background: var(--excellent-bg); color: var(--excellent-color); }
.good .score-badge, .good .grade-label { background: var(--good-bg); color: var(--good-color); }
.normal .score-badge, .normal .grade-label { background: var(--normal-bg); color: var(--normal-color); }
.card-body { padding: 1.5rem; }
.idea-name { font-size: 1.25rem; margin-bottom: 1rem; }
.event-timeline { background: #fef3c7; border-left: 4px solid #f59e0b; padding: 1rem; margin-bottom: 1rem; border-radius: 0 0.5rem 0.5rem 0; }
.event-timeline h4 { font-size: 0.9rem; color: #92400e; margin-bottom: 0.5rem; }
.event-timeline ul { margin-left: 1rem; font-size: 0.9rem; color: #78350f; }
.event-timeline li { margin-bottom: 0.25rem; }
.idea-details h4 { font-size: 0.95rem; color: var(--text-secondary); margin: 1rem 0 0.5rem 0; }
.idea-details p { font-size: 0.95rem; }
.score-breakdown { margin-top: 1.5rem; padding-top: 1rem; border-top: 1px dashed #e5e7eb; }
.score-breakdown h4 { font-size: 0.9rem; color: var(--text-secondary); margin-bottom: 0.75rem; }
.score-bar { display: flex; align-items: center; margin-bottom: 0.5rem; font-size: 0.85rem; }
.score-bar > span:first-child { width: 90px; color: var(--text-secondary); }
.score-bar > span:last-child { width: 50px; text-align: right; font-weight: 500; }
.bar { flex: 1; height: 8px; background: #e5e7eb; border-radius: 4px; margin: 0 0.5rem; overflow: hidden; }
.bar .fill { height: 100%; border-radius: 4px; }
.excellent .bar .fill { background: linear-gradient(90deg, var(--excellent-color), #34d399); }
.good .bar .fill { background: linear-gradient(90deg, var(--good-color), #60a5fa); }
.normal .bar .fill { background: linear-gradient(90deg, var(--normal-color), #9ca3af); }
.total-score { margin-top: 0.75rem; padding-top: 0.75rem; border-top: 1px solid #e5e7eb; display: flex; justify-content: space-between; font-weight: bold; }
.grade-label { display: inline-block; padding: 0.2rem 0.6rem; border-radius: 0.25rem; font-size: 0.8rem; margin-left: 0.5rem; }
footer { text-align: center; padding: 2rem; color: var(--text-secondary); font-size: 0.9rem; }
@media (max-width: 768px) {
  header h1 { font-size: 1.75rem; }
  .ideas-grid { grid-template-columns: 1fr; }
}
"#;
