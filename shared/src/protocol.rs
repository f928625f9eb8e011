/// Backend endpoint returning the full list of area records
pub const AREAS_PATH: &str = "/areas";

/// Mount point holding the area card grid
pub const GRID_ID: &str = "areasGrid";

/// Mount point holding the "Last updated" label
pub const REFRESH_LABEL_ID: &str = "refreshTime";

/// Collapsible navigation element toggled by the page's menu control
pub const MENU_ID: &str = "mobileMenu";

/// API path prefix
pub const API_PREFIX: &str = "/v1";
