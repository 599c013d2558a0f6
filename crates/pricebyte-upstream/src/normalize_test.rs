use chrono::TimeZone;
use serde_json::json;

use super::*;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap()
}

fn product_from(value: serde_json::Value) -> ApiProduct {
    serde_json::from_value(value).expect("fixture should deserialize")
}

fn base_product(store_products: serde_json::Value) -> ApiProduct {
    product_from(json!({
        "id": 101,
        "name": "Wholemeal Bread",
        "brand": "Helga's",
        "category": "bakery",
        "size": "750g",
        "unit": "g",
        "image_url": "https://shop.coles.com.au/img/101.jpg",
        "description": "Soft wholemeal loaf",
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-02T00:00:00",
        "store_products": store_products
    }))
}

fn coles_offer(raw_details: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 11,
        "store": "coles",
        "store_product_id": "CL123456",
        "store_name": "Coles",
        "current_price": 5.5,
        "availability": true,
        "product_url": "https://shop.coles.com.au/p/123456",
        "raw_details": raw_details,
        "price_history": [
            {"price": 5.0, "start_date": "2025-01-01", "end_date": "2025-02-01"},
            {"price": 5.5, "start_date": "2025-02-01", "end_date": null}
        ]
    })
}

#[test]
fn normalize_product_maps_top_level_fields() {
    let product = normalize_product(base_product(json!([])), fixed_now()).unwrap();
    assert_eq!(product.product_id, 101);
    assert_eq!(product.name, "Wholemeal Bread");
    assert_eq!(product.brand, "Helga's");
    assert_eq!(product.category, "Bakery");
    assert!((product.size - 750.0).abs() < f64::EPSILON);
    assert_eq!(product.unit, "g");
    assert_eq!(product.image_url, "https://shop.coles.com.au/img/101.jpg");
    assert!(product.long_description.is_none());
    assert!(product.nutrition.is_empty());
    assert!(product.store_products.is_empty());
}

#[test]
fn normalize_product_parses_size_and_keeps_unit() {
    let mut api = base_product(json!([]));
    api.size = "611g".to_owned();
    let product = normalize_product(api, fixed_now()).unwrap();
    assert!((product.size - 611.0).abs() < f64::EPSILON);
    assert_eq!(product.unit, "g");
}

#[test]
fn normalize_product_defaults_missing_image_to_empty_string() {
    let mut api = base_product(json!([]));
    api.image_url = None;
    let product = normalize_product(api, fixed_now()).unwrap();
    assert_eq!(product.image_url, "");
}

#[test]
fn store_names_are_capitalized() {
    let product = normalize_product(base_product(json!([coles_offer(json!(null))])), fixed_now())
        .unwrap();
    let offer = &product.store_products[0];
    assert_eq!(offer.store, "Coles");
    assert_eq!(offer.store_product_id, 11);
    assert!((offer.standard_price - 5.5).abs() < f64::EPSILON);
    assert_eq!(
        offer.product_url.as_deref(),
        Some("https://shop.coles.com.au/p/123456")
    );
}

#[test]
fn open_ended_price_history_is_closed_at_now() {
    let product = normalize_product(base_product(json!([coles_offer(json!(null))])), fixed_now())
        .unwrap();
    let history = &product.store_products[0].price_history;
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[0].start_date,
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        history[0].end_date,
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(history[1].end_date, fixed_now());
}

#[test]
fn invalid_price_history_date_is_an_error() {
    let mut offer = coles_offer(json!(null));
    offer["price_history"] = json!([{"price": 1.0, "start_date": "soon", "end_date": null}]);
    let result = normalize_product(base_product(json!([offer])), fixed_now());
    assert!(
        matches!(
            result,
            Err(NormalizeError::InvalidDate { field: "start_date", store_product_id: 11, .. })
        ),
        "expected InvalidDate(start_date), got: {result:?}"
    );
}

#[test]
fn breakdown_nutrition_energy_kj() {
    let raw = json!({
        "nutrition": {"breakdown": [{
            "title": "Per Serving",
            "nutrients": [{"nutrient": "Energy", "value": "780 kJ"}]
        }]}
    });
    let product =
        normalize_product(base_product(json!([coles_offer(raw)])), fixed_now()).unwrap();
    assert_eq!(product.nutrition.per_serving["Energy (kJ)"], "780 kJ");
}

#[test]
fn flat_nutrition_facts_are_duplicated_into_per_100g() {
    let raw = json!({"nutrition_facts": {"protein": "7g"}});
    let product =
        normalize_product(base_product(json!([coles_offer(raw)])), fixed_now()).unwrap();
    assert_eq!(product.nutrition.per_serving["Protein"], "7g");
    assert_eq!(product.nutrition.per_100g["Protein"], "7g");
}

#[test]
fn first_offer_with_nutrition_wins() {
    let mut empty = coles_offer(json!({"nutrition_facts": {}}));
    empty["id"] = json!(1);
    let mut first = coles_offer(json!({"nutrition_facts": {"fat": "3g"}}));
    first["id"] = json!(2);
    first["store"] = json!("woolworths");
    let mut second = coles_offer(json!({"nutrition_facts": {"fat": "9g"}}));
    second["id"] = json!(3);
    second["store"] = json!("aldi");

    let product =
        normalize_product(base_product(json!([empty, first, second])), fixed_now()).unwrap();
    assert_eq!(product.nutrition.per_serving["Fat - Total"], "3g");
    let stores: Vec<&str> = product
        .store_products
        .iter()
        .map(|s| s.store.as_str())
        .collect();
    assert_eq!(stores, vec!["Coles", "Woolworths", "Aldi"]);
}

#[test]
fn breakdown_without_known_sections_does_not_fall_back_to_facts_on_same_offer() {
    let raw = json!({
        "nutrition": {"breakdown": [{"title": "Ingredients", "nutrients": []}]},
        "nutrition_facts": {"protein": "7g"}
    });
    let product =
        normalize_product(base_product(json!([coles_offer(raw)])), fixed_now()).unwrap();
    assert!(product.nutrition.is_empty());
}

#[test]
fn long_description_comes_from_first_offer_that_has_one() {
    let mut plain = coles_offer(json!({"longDescription": ""}));
    plain["id"] = json!(1);
    let mut rich = coles_offer(json!({"longDescription": "Baked fresh daily."}));
    rich["id"] = json!(2);

    let product = normalize_product(base_product(json!([plain, rich])), fixed_now()).unwrap();
    assert_eq!(
        product.long_description.as_deref(),
        Some("Baked fresh daily.")
    );
}

#[test]
fn normalized_product_serializes_to_served_shape() {
    let raw = json!({"nutrition_facts": {"protein": "7g"}});
    let product =
        normalize_product(base_product(json!([coles_offer(raw)])), fixed_now()).unwrap();
    let json = serde_json::to_value(&product).expect("serialize");
    assert_eq!(json["productId"], 101);
    assert_eq!(json["category"], "Bakery");
    assert_eq!(json["size"], 750.0);
    assert_eq!(json["nutrition"]["per100g"]["Protein"], "7g");
    assert_eq!(json["storeProducts"][0]["store"], "Coles");
    assert_eq!(
        json["storeProducts"][0]["priceHistory"][1]["endDate"],
        "2025-06-15T09:30:00.000Z"
    );
}
