//! Chart Page Rendering

use crate::error::ApiError;
use chart_data::ChartData;

const CHART_TEMPLATE: &str = include_str!("../templates/chart.html");
const DATA_PLACEHOLDER: &str = "{{CHART_DATA}}";

/// The chart page template, split once at startup around the data slot.
#[derive(Debug, Clone)]
pub struct ChartPage {
    head: String,
    tail: String,
}

impl ChartPage {
    pub fn new() -> Self {
        Self::from_template(CHART_TEMPLATE)
    }

    /// Build from a template containing `{{CHART_DATA}}`; a template
    /// without the slot gets the data appended.
    pub fn from_template(template: &str) -> Self {
        let (head, tail) = template
            .split_once(DATA_PLACEHOLDER)
            .unwrap_or((template, ""));
        Self {
            head: head.to_string(),
            tail: tail.to_string(),
        }
    }

    /// Render the page with `data` embedded as a JS literal
    pub fn render(&self, data: &ChartData) -> Result<String, ApiError> {
        let json = data
            .to_json()
            .map_err(|e| ApiError::Render(e.to_string()))?
            .replace("</", "<\\/");

        let mut page = String::with_capacity(self.head.len() + json.len() + self.tail.len());
        page.push_str(&self.head);
        page.push_str(&json);
        page.push_str(&self.tail);
        Ok(page)
    }
}

impl Default for ChartPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_data::{Axis, Point, Series};

    #[test]
    fn test_render_embeds_series() {
        let data = ChartData {
            series: vec![Series::line("Temperature", "#ff7f0e", Axis::Primary, vec![Point { x: 1, y: 2.0 }])],
        };
        let html = ChartPage::new().render(&data).unwrap();
        assert!(html.contains(r#""key":"Temperature""#));
        assert!(!html.contains(DATA_PLACEHOLDER));
        assert!(html.starts_with("<html>"));
    }

    #[test]
    fn test_script_close_is_escaped() {
        let data = ChartData {
            series: vec![Series::line("</script><b>", "#000", Axis::Secondary, vec![])],
        };
        let html = ChartPage::from_template("<script>var d = {{CHART_DATA}};</script>")
            .render(&data)
            .unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r"<\/script>"));
    }
}
