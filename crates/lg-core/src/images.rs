//! Maps preview records to their illustration images.

use lg_protocol::PreviewKind;
use serde_json::Value;
use tracing::warn;

const DEFAULT_ACCOMMODATION: &str = "/img/accomodations/hotel.png";
const DEFAULT_ATTRACTION: &str = "/img/attractions/monument.png";
const DEFAULT_RESTAURANT: &str = "/img/restaurants/american.png";

pub fn accommodation_image(kind: &str) -> &'static str {
    match kind.to_lowercase().as_str() {
        "hotel" => "/img/accomodations/hotel.png",
        "airbnb" => "/img/accomodations/airbnb.png",
        "hostel" => "/img/accomodations/hostel.png",
        "villa" => "/img/accomodations/villa.png",
        _ => DEFAULT_ACCOMMODATION,
    }
}

pub fn attraction_image(kind: &str) -> &'static str {
    match kind.to_lowercase().as_str() {
        "museum" => "/img/attractions/museum.png",
        "park" => "/img/attractions/park.png",
        "restaurant" => "/img/attractions/restaurant.png",
        "monument" => "/img/attractions/monument.png",
        "beach" => "/img/attractions/beach.png",
        "market" => "/img/attractions/market.png",
        "gallery" => "/img/attractions/gallery.png",
        _ => DEFAULT_ATTRACTION,
    }
}

pub fn restaurant_image(cuisine: &str) -> &'static str {
    let normalized = cuisine.trim().to_lowercase();
    match normalized.as_str() {
        "italian" => "/img/restaurants/italian.png",
        "japanese" => "/img/restaurants/japanese.png",
        "mexican" => "/img/restaurants/mexican.png",
        "french" => "/img/restaurants/french.png",
        "american" => "/img/restaurants/american.png",
        "thai" => "/img/restaurants/thai.png",
        "fast-food" | "fast food" => "/img/restaurants/fast-food.png",
        _ => {
            warn!(cuisine, "no image for cuisine, using default");
            DEFAULT_RESTAURANT
        }
    }
}

/// Image for a preview record, if its kind has illustrations and the record
/// carries the field that selects one.
pub fn image_for(kind: &PreviewKind, data: &Value) -> Option<&'static str> {
    match kind {
        PreviewKind::Accommodation => data["type"].as_str().map(accommodation_image),
        PreviewKind::Attraction => data["type"].as_str().map(attraction_image),
        PreviewKind::Restaurant => data["cuisine"].as_str().map(restaurant_image),
        _ => None,
    }
}
