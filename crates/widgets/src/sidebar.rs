use crate::titled;
use dash_config::{LinkConfig, SidebarConfig};
use dash_core::widget::DashWidget;
use dash_theme::Theme;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

/// Heading, short description and links shown at the top of the page.
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    heading:     String,
    description: String,
    links:       Vec<LinkConfig>,
}

impl Sidebar {
    pub fn from_config(cfg: &SidebarConfig) -> Self {
        Self {
            heading:     cfg.heading.clone(),
            description: cfg.description.clone(),
            links:       cfg.links.clone(),
        }
    }

    fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(2 + 2 * self.links.len());
        if !self.description.is_empty() {
            lines.push(Line::styled(self.description.clone(), theme.text()));
        }
        for link in &self.links {
            lines.push(Line::default());
            lines.push(Line::styled(link.label.clone(), theme.text()));
            lines.push(Line::styled(link.href.clone(), theme.caption()));
        }
        lines
    }

    /// Heading as the block title, description wrapped to the column width.
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let title = if self.heading.is_empty() { "About" } else { self.heading.as_str() };
        let body = Paragraph::new(self.lines(theme))
            .wrap(Wrap { trim: true })
            .block(titled(title, theme));
        f.render_widget(body, area);
    }
}

impl DashWidget for Sidebar {
    fn id(&self) -> &str {
        "sidebar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{draw, inner};
    use dash_config::ThemeConfig;

    #[test]
    fn lists_links_after_description() {
        let sidebar = Sidebar::from_config(&SidebarConfig {
            heading:     "Finch Data".into(),
            description: "A look at Darwin's Finches.".into(),
            links: vec![LinkConfig {
                label: "PyShiny".into(),
                href:  "https://shiny.posit.co/py/".into(),
            }],
        });
        let theme = Theme::plain(&ThemeConfig::default());
        let rows = draw(32, 7, |f, area| sidebar.render(f, area, &theme));
        assert!(rows[0].starts_with("┌ Finch Data ─"));
        assert_eq!(
            inner(&rows),
            vec![
                "A look at Darwin's Finches.",
                "",
                "PyShiny",
                "https://shiny.posit.co/py/",
                "",
            ]
        );
    }

    #[test]
    fn long_description_wraps() {
        let sidebar = Sidebar::from_config(&SidebarConfig {
            heading:     String::new(),
            description: "Bill depth of finches on Daphne Major".into(),
            links:       Vec::new(),
        });
        let theme = Theme::plain(&ThemeConfig::default());
        let rows = draw(20, 5, |f, area| sidebar.render(f, area, &theme));
        assert!(rows[0].starts_with("┌ About ─"));
        assert_eq!(inner(&rows), vec!["Bill depth of", "finches on Daphne", "Major"]);
    }
}
