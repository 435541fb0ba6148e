// src/output/presenter.rs
// =============================================================================
// Turns results into console text.
//
// Rendering is pure (render_* return Strings) and the print_* wrappers only
// write to stdout. Whether colours are used comes from PresenterConfig, which
// is handed in at construction; nothing here touches global styling state.
// =============================================================================

use colored::{Color, Colorize};

use crate::error::ProbeError;
use crate::probe::{Platform, ProbeResult, RunSummary};

const BLOCK_WIDTH: usize = 72;

#[derive(Debug, Clone)]
pub struct PresenterConfig {
    /// Emit ANSI colour codes
    pub color: bool,
    /// URLs longer than this are cut and end in "..."
    pub url_width: usize,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        PresenterConfig {
            color: true,
            url_width: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Presenter {
    config: PresenterConfig,
}

impl Presenter {
    pub fn new(config: PresenterConfig) -> Self {
        Presenter { config }
    }

    pub fn render(&self, result: &ProbeResult) -> String {
        let mut lines = Vec::new();
        let border = "=".repeat(BLOCK_WIDTH);

        lines.push(self.paint(&border, Color::Yellow));
        lines.push(format!(
            " {} {}",
            self.paint("[+]", Color::Red),
            self.bold(result.platform.display_name(), Color::Cyan)
        ));
        lines.push(self.paint(&"-".repeat(BLOCK_WIDTH), Color::Yellow));
        lines.push(format!(" {:<11}: {}", "Username", result.username));
        lines.push(format!(
            " {:<11}: {}",
            "Checked at",
            result.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        lines.push(format!(
            " {:<11}: {}",
            "URL",
            truncate(&result.url, self.config.url_width)
        ));

        let status = if result.found {
            self.bold("FOUND", Color::Green)
        } else {
            self.bold("NOT FOUND", Color::Red)
        };
        lines.push(format!(" {:<11}: {}", "Status", status));

        if !result.stats.is_empty() {
            lines.push(" Stats:".to_string());
            let width = result.stats.keys().map(|k| k.chars().count()).max().unwrap_or(0);
            for (key, value) in &result.stats {
                lines.push(format!(
                    "   {:<width$} : {}",
                    key,
                    self.paint(value, Color::White),
                    width = width
                ));
            }
        }

        lines.push(self.paint(&border, Color::Yellow));
        lines.join("\n")
    }

    pub fn render_failure(&self, platform: Platform, username: &str, error: &ProbeError) -> String {
        format!(
            " {} {} ({}): {}",
            self.paint("[!]", Color::Red),
            self.bold(platform.display_name(), Color::Cyan),
            username,
            self.paint(&error.to_string(), Color::Red)
        )
    }

    pub fn render_summary(&self, summary: &RunSummary) -> String {
        let mut lines = vec!["📊 Summary:".to_string()];
        lines.push(format!("   ✅ Found: {}", self.paint(&summary.found.to_string(), Color::Green)));
        lines.push(format!("   ❌ Not found: {}", summary.not_found));
        lines.push(format!("   ⚠️  Failed: {}", self.paint(&summary.failed.to_string(), Color::Red)));
        if summary.skipped > 0 {
            lines.push(format!("   ⏭️  Skipped: {}", summary.skipped));
        }
        lines.push(format!("   📋 Total: {}", summary.total()));
        lines.join("\n")
    }

    pub fn render_banner(&self) -> String {
        let name = format!("handle-probe v{}", env!("CARGO_PKG_VERSION"));
        let tagline = "social media username checker";
        let border = "=".repeat(BLOCK_WIDTH);
        [
            self.paint(&border, Color::Yellow),
            format!(
                " {} - {}",
                self.bold(&name, Color::BrightRed),
                self.paint(tagline, Color::Green)
            ),
            self.paint(&border, Color::Yellow),
        ]
        .join("\n")
    }

    pub fn print(&self, result: &ProbeResult) {
        println!("{}", self.render(result));
    }

    pub fn print_failure(&self, platform: Platform, username: &str, error: &ProbeError) {
        println!("{}", self.render_failure(platform, username, error));
    }

    pub fn print_summary(&self, summary: &RunSummary) {
        println!();
        println!("{}", self.render_summary(summary));
    }

    pub fn print_banner(&self) {
        println!("{}\n", self.render_banner());
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.config.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Color) -> String {
        if self.config.color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Cuts `text` to at most `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}
