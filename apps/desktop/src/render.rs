//! Plain-text views for the terminal front end.

use std::fmt::Write as _;

use client_core::{
    budget::BUDGET_CEILING, insight::NO_INSIGHTS_MESSAGE, DetailView, OutreachDraft,
    ThemeContext,
};
use shared::{
    directory::{DirectoryStats, StatusFilter, EMPTY_STATE_HINT, EMPTY_STATE_TITLE},
    domain::{
        BudgetAllocation, ConstituencyRecord, DashboardReport, DocumentSlot,
        GeneratedDocumentBundle, SpendingCategory, ThemeMode, TransparencyStatus,
    },
};

const BAR_WIDTH: usize = 30;

/// Renders against the active theme. Dark mode uses ANSI emphasis.
pub struct Renderer {
    theme: ThemeContext,
}

impl Renderer {
    pub fn new(theme: ThemeContext) -> Self {
        Self { theme }
    }

    fn heading(&self, text: &str) -> String {
        match self.theme.mode() {
            ThemeMode::Dark => format!("\x1b[1;97m{text}\x1b[0m"),
            ThemeMode::Light => format!("{text}\n{}", "=".repeat(text.chars().count())),
        }
    }

    pub fn directory(
        &self,
        all: &[ConstituencyRecord],
        shown: &[&ConstituencyRecord],
        filter: StatusFilter,
    ) -> String {
        let stats = DirectoryStats::from_records(all);
        let mut out = self.heading("Constituencies");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total {} | Current {} | Outdated {} | Missing {} | Showing {} ({filter})",
            stats.total,
            stats.current,
            stats.outdated,
            stats.missing,
            shown.len(),
        );

        if shown.is_empty() {
            let _ = writeln!(out, "\n{EMPTY_STATE_TITLE}\n{EMPTY_STATE_HINT}");
            return out;
        }

        for record in shown {
            let _ = writeln!(
                out,
                "  {:<28} {:<24} {:<16} {:<9} {}",
                record.constituency_name,
                record.mp_name,
                record.state,
                record.transparency_status.label(),
                record.route().to_path(),
            );
        }
        out
    }

    pub fn dashboard(&self, report: &DashboardReport) -> String {
        let mut out = self.heading(&report.constituency_name);
        let _ = writeln!(out);
        let _ = writeln!(out, "MP: {}", report.mp_name);
        if let Some(state) = &report.state {
            let _ = writeln!(out, "State: {state}");
        }
        if let Some(date) = report.last_report_date {
            let _ = writeln!(out, "Last report: {date}");
        }
        let _ = writeln!(
            out,
            "Total expenditure: {} across {} projects",
            format_rupees(report.total_expenditure),
            report.total_projects
        );

        let _ = writeln!(out, "\nSpending by category");
        out.push_str(&category_bars(&report.spending_by_category));

        if !report.top_contractors.is_empty() {
            let _ = writeln!(out, "\nTop contractors");
            for contractor in &report.top_contractors {
                let _ = writeln!(
                    out,
                    "  {:<32} {}",
                    contractor.name,
                    format_rupees(contractor.amount)
                );
            }
        }

        let _ = writeln!(out, "\nInsights");
        if report.insights.is_empty() {
            let _ = writeln!(out, "  {NO_INSIGHTS_MESSAGE}");
        }
        for insight in &report.insights {
            let _ = writeln!(
                out,
                "  [{}] #{} {}\n      {}",
                insight.severity, insight.id, insight.title, insight.finding
            );
        }
        out
    }

    pub fn insight_detail(&self, view: &DetailView) -> String {
        let Some(insight) = view.insight() else {
            return String::new();
        };
        let mut out = self.heading(&insight.title);
        let _ = writeln!(out);
        if let Some(text) = view.text() {
            let _ = writeln!(out, "{text}");
        }
        out
    }

    pub fn budget(&self, name: &str, allocation: &BudgetAllocation, chart: &[SpendingCategory]) -> String {
        let mut out = self.heading(&format!("Optimal budget for {name}"));
        let _ = writeln!(out);
        out.push_str(&category_bars(chart));
        let _ = writeln!(
            out,
            "Allocated {} of {}",
            format_rupees(allocation.total()),
            format_rupees(BUDGET_CEILING)
        );
        for item in allocation.items() {
            let _ = writeln!(
                out,
                "\n  {}: {}\n    {}\n    e.g. {}",
                item.category,
                format_rupees(item.amount),
                item.justification,
                item.example_project
            );
        }
        out
    }

    pub fn outreach(&self, status: TransparencyStatus, draft: &OutreachDraft) -> String {
        let mut out = self.heading(&format!("Outreach ({})", status.label()));
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "To: {}",
            draft.recipient.as_deref().unwrap_or("(no email on record)")
        );
        let _ = writeln!(out, "{}\n", draft.body);
        let _ = writeln!(out, "Open in mail client: {}", draft.mailto_link());
        out
    }

    pub fn documents(&self, bundle: &GeneratedDocumentBundle) -> String {
        let mut out = String::new();
        for slot in DocumentSlot::ALL {
            out.push_str(&self.heading(slot.title()));
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", slot.subtitle());
            for (step, line) in slot.guidance().iter().enumerate() {
                let _ = writeln!(out, "  {}. {line}", step + 1);
            }
            if let Some(url) = slot.portal_url() {
                let _ = writeln!(out, "  Portal: {url}");
            }
            let _ = writeln!(out, "\n{}\n", bundle.document(slot));
        }
        out
    }
}

fn category_bars(categories: &[SpendingCategory]) -> String {
    let mut out = String::new();
    for category in categories {
        let filled = ((category.percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round()
            as usize;
        let _ = writeln!(
            out,
            "  {:<28} {}{} {:>5.1}%",
            category.category,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            category.percentage
        );
    }
    out
}

/// Lakh/crore figures read as "Rs 1.50 Cr" or "Rs 12.00 L".
pub fn format_rupees(amount: f64) -> String {
    if amount >= 10_000_000.0 {
        format!("Rs {:.2} Cr", amount / 10_000_000.0)
    } else if amount >= 100_000.0 {
        format!("Rs {:.2} L", amount / 100_000.0)
    } else {
        format!("Rs {amount:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ConstituencyId;

    fn record(name: &str, status: TransparencyStatus) -> ConstituencyRecord {
        ConstituencyRecord {
            id: ConstituencyId(1),
            mp_name: "A. Kumar".into(),
            constituency_name: name.into(),
            state: "Karnataka".into(),
            transparency_status: status,
            last_report_date: None,
            mp_email: None,
        }
    }

    #[test]
    fn rupee_amounts_use_indian_units() {
        assert_eq!(format_rupees(50_000_000.0), "Rs 5.00 Cr");
        assert_eq!(format_rupees(250_000.0), "Rs 2.50 L");
        assert_eq!(format_rupees(999.0), "Rs 999");
    }

    #[test]
    fn empty_directory_shows_hint() {
        let renderer = Renderer::new(ThemeContext::new(ThemeMode::Light));
        let all = vec![record("Example North", TransparencyStatus::Current)];

        let out = renderer.directory(&all, &[], StatusFilter::Only(TransparencyStatus::Missing));

        assert!(out.contains("Total 1 | Current 1 | Outdated 0 | Missing 0 | Showing 0 (Missing)"));
        assert!(out.contains(EMPTY_STATE_TITLE));
        assert!(out.contains(EMPTY_STATE_HINT));
    }

    #[test]
    fn directory_rows_link_to_their_route() {
        let renderer = Renderer::new(ThemeContext::new(ThemeMode::Light));
        let all = vec![record("Example North", TransparencyStatus::Current)];
        let shown: Vec<_> = all.iter().collect();

        let out = renderer.directory(&all, &shown, StatusFilter::All);

        assert!(out.contains("/dashboard/example-north"));
    }

    #[test]
    fn dark_theme_changes_headings() {
        let theme = ThemeContext::new(ThemeMode::Light);
        let renderer = Renderer::new(theme.clone());
        let light = renderer.heading("Insights");
        theme.toggle();
        let dark = renderer.heading("Insights");

        assert!(light.ends_with("========"));
        assert!(dark.starts_with("\x1b["));
    }
}
