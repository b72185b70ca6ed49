//! The closed set of endpoints the sync pipeline snapshots.
//!
//! # Route mapping
//!
//! Routes are relative to the application root and mirror the static
//! bundle layout, so a route doubles as the default output path.
//!
//! | Endpoint                       | Route (`<l>` = language, `<id>` = trek)          | Kind          |
//! |--------------------------------|--------------------------------------------------|---------------|
//! | `Parameters`                   | `api/<l>/parameters.json`                        | JSON listing  |
//! | `Themes`                       | `api/<l>/themes.json`                            | JSON listing  |
//! | `TrekList`                     | `api/<l>/treks.geojson`                          | GeoJSON       |
//! | `PoiList`                      | `api/<l>/pois.geojson`                           | GeoJSON       |
//! | `FlatPageList`                 | `api/<l>/flatpages.geojson`                      | GeoJSON       |
//! | `ServiceList`                  | `api/<l>/services.geojson`                       | GeoJSON       |
//! | `FeedbackCategories`           | `api/<l>/feedback/categories.json`               | JSON listing  |
//! | `TouristicContentList`         | `api/<l>/touristiccontents.geojson`              | GeoJSON       |
//! | `TouristicEventList`           | `api/<l>/touristicevents.geojson`                | GeoJSON       |
//! | `TouristicCategories`          | `api/<l>/touristiccategories.json`               | JSON listing  |
//! | `TrekPois`                     | `api/<l>/treks/<id>/pois.geojson`                | GeoJSON       |
//! | `TrekPoisAndTouristicContents` | `api/<l>/treks/<id>/pois-touristiccontents.geojson` | GeoJSON    |
//! | `TrekServices`                 | `api/<l>/treks/<id>/services.geojson`            | GeoJSON       |
//! | `TrekTouristicContents`        | `api/<l>/treks/<id>/touristiccontents.geojson`   | GeoJSON       |
//! | `TrekTouristicEvents`          | `api/<l>/treks/<id>/touristicevents.geojson`     | GeoJSON       |
//! | `TrekGpx`                      | `api/<l>/treks/<id>/<slug>.gpx`                  | GPX           |
//! | `TrekKml`                      | `api/<l>/treks/<id>/<slug>.kml`                  | KML           |
//! | `TrekDocument`                 | `api/<l>/treks/<id>/<slug>.pdf`                  | Document      |
//! | `ElevationProfile`             | `api/<l>/treks/<id>/profile.json`                | Elevation     |
//! | `ElevationChart`               | `api/<l>/treks/<id>/profile.png`                 | Raster chart  |
//! | `ElevationArea`                | `api/<l>/treks/<id>/dem.json`                    | Elevation     |

use std::fmt;

use rando_core::{Language, TrekId};

/// What a response body holds; used for logging and content negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    JsonListing,
    GeoJson,
    Document,
    Gpx,
    Kml,
    RasterChart,
    Elevation,
}

impl ExportKind {
    pub fn mime(&self) -> &'static str {
        match self {
            ExportKind::JsonListing | ExportKind::Elevation => "application/json",
            ExportKind::GeoJson => "application/geo+json",
            ExportKind::Document => "application/pdf",
            ExportKind::Gpx => "application/gpx+xml",
            ExportKind::Kml => "application/vnd.google-earth.kml+xml",
            ExportKind::RasterChart => "image/png",
        }
    }
}

/// A trek identifier together with the slug used in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrekRef {
    pub id: TrekId,
    pub slug: String,
}

/// One renderable endpoint, carrying its path parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Parameters,
    Themes,
    TrekList,
    PoiList,
    FlatPageList,
    ServiceList,
    FeedbackCategories,
    TouristicContentList,
    TouristicEventList,
    TouristicCategories,
    TrekPois(TrekId),
    TrekPoisAndTouristicContents(TrekId),
    TrekServices(TrekId),
    TrekTouristicContents(TrekId),
    TrekTouristicEvents(TrekId),
    TrekGpx(TrekRef),
    TrekKml(TrekRef),
    TrekDocument(TrekRef),
    ElevationProfile(TrekId),
    ElevationChart(TrekId),
    ElevationArea(TrekId),
}

impl Endpoint {
    pub fn kind(&self) -> ExportKind {
        match self {
            Endpoint::Parameters
            | Endpoint::Themes
            | Endpoint::FeedbackCategories
            | Endpoint::TouristicCategories => ExportKind::JsonListing,
            Endpoint::TrekList
            | Endpoint::PoiList
            | Endpoint::FlatPageList
            | Endpoint::ServiceList
            | Endpoint::TouristicContentList
            | Endpoint::TouristicEventList
            | Endpoint::TrekPois(_)
            | Endpoint::TrekPoisAndTouristicContents(_)
            | Endpoint::TrekServices(_)
            | Endpoint::TrekTouristicContents(_)
            | Endpoint::TrekTouristicEvents(_) => ExportKind::GeoJson,
            Endpoint::TrekGpx(_) => ExportKind::Gpx,
            Endpoint::TrekKml(_) => ExportKind::Kml,
            Endpoint::TrekDocument(_) => ExportKind::Document,
            Endpoint::ElevationProfile(_) | Endpoint::ElevationArea(_) => ExportKind::Elevation,
            Endpoint::ElevationChart(_) => ExportKind::RasterChart,
        }
    }

    /// The trek this endpoint is scoped to, if any.
    pub fn trek(&self) -> Option<TrekId> {
        match self {
            Endpoint::TrekPois(id)
            | Endpoint::TrekPoisAndTouristicContents(id)
            | Endpoint::TrekServices(id)
            | Endpoint::TrekTouristicContents(id)
            | Endpoint::TrekTouristicEvents(id)
            | Endpoint::ElevationProfile(id)
            | Endpoint::ElevationChart(id)
            | Endpoint::ElevationArea(id) => Some(*id),
            Endpoint::TrekGpx(t) | Endpoint::TrekKml(t) | Endpoint::TrekDocument(t) => Some(t.id),
            _ => None,
        }
    }

    /// Route relative to the application root, using `/` separators.
    pub fn route(&self, lang: &Language) -> String {
        let file = match self {
            Endpoint::Parameters => "parameters.json".to_string(),
            Endpoint::Themes => "themes.json".to_string(),
            Endpoint::TrekList => "treks.geojson".to_string(),
            Endpoint::PoiList => "pois.geojson".to_string(),
            Endpoint::FlatPageList => "flatpages.geojson".to_string(),
            Endpoint::ServiceList => "services.geojson".to_string(),
            Endpoint::FeedbackCategories => "feedback/categories.json".to_string(),
            Endpoint::TouristicContentList => "touristiccontents.geojson".to_string(),
            Endpoint::TouristicEventList => "touristicevents.geojson".to_string(),
            Endpoint::TouristicCategories => "touristiccategories.json".to_string(),
            Endpoint::TrekPois(id) => format!("treks/{id}/pois.geojson"),
            Endpoint::TrekPoisAndTouristicContents(id) => {
                format!("treks/{id}/pois-touristiccontents.geojson")
            }
            Endpoint::TrekServices(id) => format!("treks/{id}/services.geojson"),
            Endpoint::TrekTouristicContents(id) => format!("treks/{id}/touristiccontents.geojson"),
            Endpoint::TrekTouristicEvents(id) => format!("treks/{id}/touristicevents.geojson"),
            Endpoint::TrekGpx(t) => format!("treks/{}/{}.gpx", t.id, t.slug),
            Endpoint::TrekKml(t) => format!("treks/{}/{}.kml", t.id, t.slug),
            Endpoint::TrekDocument(t) => format!("treks/{}/{}.pdf", t.id, t.slug),
            Endpoint::ElevationProfile(id) => format!("treks/{id}/profile.json"),
            Endpoint::ElevationChart(id) => format!("treks/{id}/profile.png"),
            Endpoint::ElevationArea(id) => format!("treks/{id}/dem.json"),
        };
        format!("api/{lang}/{file}")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trek() {
            Some(id) => write!(f, "{:?}#{id}", self.kind()),
            None => write!(f, "{:?}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lac() -> TrekRef {
        TrekRef {
            id: TrekId(12),
            slug: "lac-blanc".to_string(),
        }
    }

    #[rstest]
    #[case(Endpoint::TrekList, "api/fr/treks.geojson")]
    #[case(Endpoint::FeedbackCategories, "api/fr/feedback/categories.json")]
    #[case(Endpoint::TrekPois(TrekId(12)), "api/fr/treks/12/pois.geojson")]
    #[case(Endpoint::TrekGpx(lac()), "api/fr/treks/12/lac-blanc.gpx")]
    #[case(Endpoint::TrekDocument(lac()), "api/fr/treks/12/lac-blanc.pdf")]
    #[case(Endpoint::ElevationArea(TrekId(12)), "api/fr/treks/12/dem.json")]
    fn routes_mirror_bundle_layout(#[case] endpoint: Endpoint, #[case] expected: &str) {
        assert_eq!(endpoint.route(&Language::from("fr")), expected);
    }

    #[test]
    fn kinds_cover_every_export_format() {
        assert_eq!(Endpoint::Themes.kind(), ExportKind::JsonListing);
        assert_eq!(Endpoint::TrekKml(lac()).kind(), ExportKind::Kml);
        assert_eq!(Endpoint::ElevationChart(TrekId(1)).kind(), ExportKind::RasterChart);
        assert_eq!(ExportKind::Document.mime(), "application/pdf");
    }

    #[test]
    fn trek_scope_is_exposed() {
        assert_eq!(Endpoint::TrekList.trek(), None);
        assert_eq!(Endpoint::TrekKml(lac()).trek(), Some(TrekId(12)));
    }
}
