use askama::Template;
use shared::types::AreaRecord;
use crate::error::Result;
use crate::render::status::{capacity_band, status_class};

/// Every interpolated field goes through askama's HTML escaping.
#[derive(Template)]
#[template(path = "area_card.html")]
struct AreaCardTemplate<'a> {
    area_id: String,
    name: &'a str,
    status: &'a str,
    status_class: &'static str,
    people_count: u32,
    capacity: &'static str,
    time_ago: &'a str,
    is_outdated: bool,
}

impl<'a> From<&'a AreaRecord> for AreaCardTemplate<'a> {
    fn from(area: &'a AreaRecord) -> Self {
        Self {
            area_id: area.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            name: &area.name,
            status: &area.status,
            status_class: status_class(&area.status),
            people_count: area.people_count,
            capacity: capacity_band(&area.status),
            time_ago: &area.time_ago,
            is_outdated: area.is_outdated,
        }
    }
}

/// Render a single area card.
pub fn render_card(area: &AreaRecord) -> Result<String> {
    Ok(AreaCardTemplate::from(area).render()?)
}

/// Render a whole snapshot, cards in the order received.
pub fn render_grid(areas: &[AreaRecord]) -> Result<String> {
    let mut html = String::new();
    for area in areas {
        html.push_str(&render_card(area)?);
    }
    Ok(html)
}
