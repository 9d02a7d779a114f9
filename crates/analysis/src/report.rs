//! Printable HTML reports
//!
//! Both reports are self-contained documents (inline CSS, no external assets)
//! meant to be opened in a browser and printed.

use chrono::NaiveDate;
use serde::Deserialize;
use virantis_common::{Application, Severity, Threat, ThreatModel};

use crate::aggregation::{portfolio_stats, severity_counts, SecurityPosture};
use crate::projection::{attack_path_nodes, resolve_component_name, sort_threats, ThreatSortKey};

const PRODUCT_NAME: &str = "Virantis";

const STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #1a1a2e; background: #ffffff; padding: 40px; }
    .container { max-width: 800px; margin: 0 auto; }
    .header { text-align: center; margin-bottom: 40px; padding-bottom: 30px; border-bottom: 2px solid #e5e5e5; }
    h1 { font-size: 28px; margin-bottom: 10px; color: #0a0a14; }
    h2 { font-size: 20px; margin-top: 30px; margin-bottom: 15px; color: #0a0a14; border-bottom: 1px solid #e5e5e5; padding-bottom: 8px; }
    h3 { font-size: 16px; margin-top: 20px; margin-bottom: 10px; }
    .meta { color: #71717a; font-size: 14px; }
    .summary { background: #f8f9fa; padding: 20px; border-radius: 8px; margin-bottom: 30px; }
    .stats-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; }
    .stat-card { background: #f8f9fa; padding: 15px; border-radius: 8px; text-align: center; }
    .stat-value { font-size: 28px; font-weight: 700; }
    .stat-label { font-size: 12px; color: #71717a; text-transform: uppercase; }
    .attack-path { background: #fef2f2; border: 1px solid #fecaca; padding: 20px; border-radius: 8px; }
    .stage-node { display: inline-block; background: #fff; border: 1px solid #fca5a5; padding: 4px 10px; border-radius: 4px; font-size: 13px; }
    .stage-arrow { margin: 0 6px; color: #ef4444; }
    .threat-card { border: 1px solid #e5e5e5; border-radius: 8px; padding: 20px; margin-bottom: 20px; page-break-inside: avoid; }
    .severity-badge { color: #fff; padding: 2px 8px; border-radius: 4px; font-size: 12px; text-transform: uppercase; font-weight: 600; margin-right: 8px; }
    .threat-title { font-weight: 600; }
    .threat-meta { color: #71717a; font-size: 13px; margin: 6px 0 10px; }
    table { width: 100%; border-collapse: collapse; margin: 10px 0; font-size: 13px; }
    th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #e5e5e5; }
    .mitigation { background: #f0fdf4; border-left: 3px solid #22c55e; padding: 10px; font-size: 14px; }
    .posture-value { font-size: 32px; font-weight: 700; }
    .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #e5e5e5; text-align: center; color: #71717a; font-size: 12px; }
"#;

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn open_document(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    html.push_str(&format!("  <style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n  <div class=\"container\">\n");
}

fn close_document(html: &mut String, footer_line: &str) {
    html.push_str("    <div class=\"footer\">\n");
    html.push_str(&format!(
        "      <p>Generated by {} Threat Modeling Platform</p>\n",
        PRODUCT_NAME
    ));
    html.push_str(&format!("      <p>{}</p>\n", escape_html(footer_line)));
    html.push_str("    </div>\n  </div>\n");
    html.push_str("  <script>window.onload = function() { setTimeout(function() { window.print(); }, 500); };</script>\n");
    html.push_str("</body>\n</html>\n");
}

fn stat_card(html: &mut String, value: impl std::fmt::Display, label: &str, color: &str) {
    html.push_str(&format!(
        "      <div class=\"stat-card\"><div class=\"stat-value\" style=\"color: {}\">{}</div><div class=\"stat-label\">{}</div></div>\n",
        color, value, label
    ));
}

fn severity_badge(severity: Severity) -> String {
    format!(
        "<span class=\"severity-badge\" style=\"background-color: {}\">{}</span>",
        severity.style().color,
        severity.as_str()
    )
}

/// Full threat model report: statistics, attack path, per-threat DREAD
/// breakdown and recommendations.
pub fn generate_threat_report(model: &ThreatModel, generated_on: NaiveDate) -> String {
    let date = format_date(generated_on);
    let app_name = escape_html(&model.application.name);
    let counts = severity_counts(&model.threats);
    let mut html = String::new();

    open_document(
        &mut html,
        &format!("{} Threat Model Report - {}", PRODUCT_NAME, model.application.name),
    );

    html.push_str("    <div class=\"header\">\n");
    html.push_str("      <h1>Threat Model Report</h1>\n");
    html.push_str(&format!(
        "      <p class=\"meta\">{} | Generated {}</p>\n",
        app_name, date
    ));
    html.push_str("    </div>\n");

    // Executive summary
    html.push_str("    <div class=\"summary\">\n");
    html.push_str("      <h2 style=\"margin-top: 0; border: none;\">Executive Summary</h2>\n");
    html.push_str(&format!(
        "      <p>{}</p>\n",
        escape_html(&model.application.description)
    ));
    html.push_str(&format!(
        "      <p style=\"margin-top: 10px;\">This automated threat analysis identified <strong>{} security threats</strong>, including <strong style=\"color: {}\">{} critical</strong> and <strong style=\"color: {}\">{} high</strong> severity issues requiring immediate attention.</p>\n",
        counts.total,
        Severity::Critical.style().color,
        counts.critical,
        Severity::High.style().color,
        counts.high
    ));
    html.push_str("    </div>\n");

    // Statistics
    html.push_str("    <h2>Threat Statistics</h2>\n    <div class=\"stats-grid\">\n");
    stat_card(&mut html, counts.total, "Total Threats", "#1a1a2e");
    stat_card(&mut html, counts.critical, "Critical", Severity::Critical.style().color);
    stat_card(&mut html, counts.high, "High", Severity::High.style().color);
    stat_card(&mut html, counts.medium, "Medium", Severity::Medium.style().color);
    html.push_str("    </div>\n");

    // Attack path
    let path = &model.attack_path;
    html.push_str("    <h2>Attack Path Analysis</h2>\n    <div class=\"attack-path\">\n");
    html.push_str(&format!("      <h3>{}</h3>\n", escape_html(&path.name)));
    html.push_str(&format!(
        "      <p style=\"color: #7f1d1d; font-size: 14px;\">{}</p>\n      <div>",
        escape_html(&path.description)
    ));
    let nodes: Vec<String> = attack_path_nodes(path, &model.components)
        .into_iter()
        .map(|node| format!("<span class=\"stage-node\">{}</span>", escape_html(node)))
        .collect();
    html.push_str(&nodes.join("<span class=\"stage-arrow\">&rarr;</span>"));
    html.push_str("</div>\n    </div>\n");

    // Threats, most severe first
    html.push_str("    <h2>Detailed Threat Analysis</h2>\n");
    for threat in sort_threats(&model.threats, ThreatSortKey::Severity) {
        push_threat_card(&mut html, threat, model);
    }

    // Recommendations
    if !model.summary.recommendations.is_empty() {
        html.push_str("    <h2>Recommendations</h2>\n    <ul>\n");
        for rec in &model.summary.recommendations {
            html.push_str(&format!("      <li>{}</li>\n", escape_html(rec)));
        }
        html.push_str("    </ul>\n");
    }

    close_document(&mut html, &format!("Report Date: {}", date));
    html
}

fn push_threat_card(html: &mut String, threat: &Threat, model: &ThreatModel) {
    html.push_str("    <div class=\"threat-card\">\n");
    html.push_str(&format!(
        "      <div>{}<span class=\"threat-title\">{}</span></div>\n",
        severity_badge(threat.severity),
        escape_html(&threat.name)
    ));
    html.push_str(&format!(
        "      <div class=\"threat-meta\">{} | {} | Affects: {}</div>\n",
        escape_html(&threat.category),
        escape_html(&threat.source),
        escape_html(resolve_component_name(
            &threat.affected_component,
            &model.components
        ))
    ));
    html.push_str(&format!("      <p>{}</p>\n", escape_html(&threat.description)));

    html.push_str("      <table>\n        <tr><th>DREAD Metric</th><th>Score</th></tr>\n");
    for (name, value) in threat.dread.factors() {
        html.push_str(&format!(
            "        <tr><td>{}</td><td>{}/10</td></tr>\n",
            name, value
        ));
    }
    html.push_str(&format!(
        "        <tr style=\"font-weight: 600\"><td>Total Score</td><td>{}/50</td></tr>\n      </table>\n",
        threat.dread.total
    ));

    html.push_str(&format!(
        "      <div class=\"mitigation\"><strong>Recommended Mitigation:</strong> {}</div>\n",
        escape_html(&threat.mitigation)
    ));
    html.push_str("    </div>\n");
}

/// Sections included in the executive summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub include_risks: bool,
    pub include_recommendations: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            include_risks: true,
            include_recommendations: true,
        }
    }
}

/// Highest-ranked critical and high threats, by DREAD total then severity
pub fn top_risks(threats: &[Threat], limit: usize) -> Vec<&Threat> {
    let mut risks: Vec<&Threat> = threats
        .iter()
        .filter(|t| matches!(t.severity, Severity::Critical | Severity::High))
        .collect();
    risks.sort_by(|a, b| {
        b.dread
            .total
            .cmp(&a.dread.total)
            .then_with(|| a.severity.rank().cmp(&b.severity.rank()))
    });
    risks.truncate(limit);
    risks
}

/// Portfolio-level summary for leadership
pub fn generate_executive_summary(
    applications: &[Application],
    model: &ThreatModel,
    options: SummaryOptions,
    generated_on: NaiveDate,
) -> String {
    let date = format_date(generated_on);
    let stats = portfolio_stats(applications);
    let posture = SecurityPosture::classify(stats.critical_issues, stats.high_issues);
    let mut html = String::new();

    open_document(
        &mut html,
        &format!("{} Executive Security Summary - {}", PRODUCT_NAME, date),
    );

    html.push_str("    <div class=\"header\">\n");
    html.push_str("      <h1>Executive Security Summary</h1>\n");
    html.push_str(&format!("      <p class=\"meta\">{}</p>\n", date));
    html.push_str("    </div>\n");

    html.push_str("    <div class=\"summary\">\n");
    html.push_str("      <p class=\"stat-label\">Overall Security Posture</p>\n");
    html.push_str(&format!(
        "      <div class=\"posture-value\" style=\"color: {}\">{}</div>\n",
        posture.color(),
        posture.label()
    ));
    html.push_str("    </div>\n");

    html.push_str("    <div class=\"stats-grid\">\n");
    stat_card(&mut html, stats.total_apps, "Applications", "#1a1a2e");
    stat_card(&mut html, stats.total_threats, "Total Threats", "#1a1a2e");
    stat_card(&mut html, stats.critical_issues, "Critical", Severity::Critical.style().color);
    stat_card(&mut html, stats.high_issues, "High", Severity::High.style().color);
    html.push_str("    </div>\n");

    let risks = top_risks(&model.threats, 3);
    if options.include_risks && !risks.is_empty() {
        html.push_str("    <h2>Top Priority Risks</h2>\n    <table>\n");
        html.push_str(
            "      <tr><th>Application</th><th>Risk</th><th>Severity</th><th>Business Impact</th></tr>\n",
        );
        for threat in &risks {
            html.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&model.application.name),
                escape_html(&threat.name),
                severity_badge(threat.severity),
                escape_html(&threat.description)
            ));
        }
        html.push_str("    </table>\n");
    }

    if options.include_recommendations {
        let recommendations: Vec<&str> = if model.summary.recommendations.is_empty() {
            risks.iter().map(|t| t.mitigation.as_str()).collect()
        } else {
            model
                .summary
                .recommendations
                .iter()
                .map(String::as_str)
                .collect()
        };

        if !recommendations.is_empty() {
            html.push_str("    <h2>Key Recommendations</h2>\n    <ul>\n");
            for rec in recommendations {
                html.push_str(&format!("      <li>{}</li>\n", escape_html(rec)));
            }
            html.push_str("    </ul>\n");
        }
    }

    close_document(&mut html, "Confidential - For internal use only");
    html
}
