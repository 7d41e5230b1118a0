//! Text rendering for mlrctl
//!
//! Renderers return strings so they can be tested without a terminal.

use mlr_shared::claims::ClaimRegistry;
use mlr_shared::limits::CharacterLimits;
use mlr_shared::presentation::ResultsReport;
use mlr_shared::violation::{remove_violation_prefix, ViolationKind, ViolationStatus};
use owo_colors::OwoColorize;
use std::fmt::Write;
use std::io::IsTerminal;

/// Whether to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Always,
    Never,
}

impl ColorMode {
    /// Color only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self::resolve(
            std::env::var_os("NO_COLOR").is_some(),
            std::io::stdout().is_terminal(),
        )
    }

    fn resolve(no_color: bool, is_terminal: bool) -> Self {
        if is_terminal && !no_color {
            ColorMode::Always
        } else {
            ColorMode::Never
        }
    }

    fn good(self, s: &str) -> String {
        match self {
            ColorMode::Always => s.green().to_string(),
            ColorMode::Never => s.to_string(),
        }
    }

    fn bad(self, s: &str) -> String {
        match self {
            ColorMode::Always => s.red().to_string(),
            ColorMode::Never => s.to_string(),
        }
    }

    fn notice(self, s: &str) -> String {
        match self {
            ColorMode::Always => s.yellow().to_string(),
            ColorMode::Never => s.to_string(),
        }
    }

    fn heading(self, s: &str) -> String {
        match self {
            ColorMode::Always => s.bold().to_string(),
            ColorMode::Never => s.to_string(),
        }
    }
}

/// Grouped report for one experience.
pub fn render_report(report: &ResultsReport, color: ColorMode) -> String {
    let mut out = String::new();

    let banner = if report.has_issues() {
        color.notice(&report.banner)
    } else {
        color.good(&report.banner)
    };
    let _ = writeln!(out, "{}", banner);

    for pod in &report.pods {
        if let Some(heading) = pod.heading() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", color.heading(&heading));
        }
        for field in &pod.fields {
            let badge = if field.issue_count > 0 {
                color.bad(&field.badge())
            } else {
                color.good(&field.badge())
            };
            let _ = writeln!(out, "  {} [{}]", color.heading(&field.display_name), badge);

            for issue in field.issues() {
                let Some(message) = issue.message() else {
                    continue;
                };
                let line = match issue.kind() {
                    Some(ViolationKind::Rule) => remove_violation_prefix(message),
                    _ => message,
                };
                let _ = writeln!(out, "    ! {}", line);
            }
        }
    }

    out
}

pub fn render_libraries(registry: &ClaimRegistry) -> String {
    let mut out = String::new();
    for library in registry.iter() {
        let _ = writeln!(
            out,
            "{} ({}, {} claims)",
            library.name,
            library.id,
            library.claims.len()
        );
        for claim in &library.claims {
            let _ = writeln!(out, "  {:<8} {}", claim.id, claim.description);
        }
    }
    out
}

pub fn render_limits(limits: &CharacterLimits) -> String {
    if limits.is_empty() {
        return "No character limits configured\n".to_string();
    }
    let mut out = String::new();
    for (field, max) in limits.iter() {
        let _ = writeln!(out, "{:<16} {}", field, max);
    }
    out
}

/// One-line outcome of a single claim check.
pub fn render_status(status: ViolationStatus, message: Option<&str>, color: ColorMode) -> String {
    let label = match status {
        ViolationStatus::Valid => color.good(status.as_str()),
        ViolationStatus::Violated => color.bad(status.as_str()),
        ViolationStatus::NotApplicable => status.as_str().to_string(),
    };
    match message {
        Some(message) => format!("{}: {}", label, message),
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlr_shared::presentation::build_report;
    use mlr_shared::violation::{ClaimResults, Violation};

    #[test]
    fn test_render_report_plain() {
        let mut results = ClaimResults::new();
        results.insert(
            "pod1_header".into(),
            vec![
                Violation::claim_violated("Taken once daily for consistent symptom control."),
                Violation::rule_violated("Max character limit for pod1_header is 80"),
            ],
        );
        results.insert("body".into(), vec![Violation::valid()]);

        let text = render_report(&build_report(&results, 0), ColorMode::Never);
        assert_eq!(
            text,
            "Two issues need attention on Email 1\n\
             \x20 Body [No issues]\n\
             \n\
             Section 1\n\
             \x20 Header [2 issues]\n\
             \x20   ! Violated claim: Taken once daily for consistent symptom control.\n\
             \x20   ! Max character limit for pod1_header is 80\n"
        );
    }

    #[test]
    fn test_color_needs_terminal() {
        assert_eq!(ColorMode::resolve(false, true), ColorMode::Always);
        assert_eq!(ColorMode::resolve(false, false), ColorMode::Never);
        assert_eq!(ColorMode::resolve(true, true), ColorMode::Never);
    }

    #[test]
    fn test_detect_without_terminal_is_plain() {
        // Test harness captures stdout, so it is never a terminal here.
        if !std::io::stdout().is_terminal() {
            assert_eq!(ColorMode::detect(), ColorMode::Never);
        }
    }

    #[test]
    fn test_render_status() {
        assert_eq!(
            render_status(ViolationStatus::NotApplicable, None, ColorMode::Never),
            "n/a"
        );
        assert_eq!(
            render_status(ViolationStatus::Violated, Some("Violated claim: x"), ColorMode::Never),
            "violated: Violated claim: x"
        );
    }

    #[test]
    fn test_render_limits() {
        let text = render_limits(&CharacterLimits::default());
        assert!(text.contains("header"));
        assert!(text.contains("300"));
        assert_eq!(
            render_limits(&CharacterLimits::empty()),
            "No character limits configured\n"
        );
    }
}
