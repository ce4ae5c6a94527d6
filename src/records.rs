//! Sales record types as delivered by the products API.
//!
//! Field names on the wire are the API's Portuguese column names; the Rust
//! side uses English names and serde renames.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One sales transaction line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: Decimal,
    #[serde(rename = "Frete")]
    pub freight: Decimal,
    #[serde(rename = "Data da Compra", with = "br_date")]
    pub purchase_date: NaiveDate,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub location: String,
    #[serde(rename = "Avaliação da compra")]
    pub rating: u8,
    #[serde(rename = "Tipo de pagamento")]
    pub payment_type: String,
    #[serde(rename = "Quantidade de parcelas")]
    pub installments: u32,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl SaleRecord {
    pub fn geo(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

/// A state's fixed geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Purchase dates travel as `dd/mm/yyyy`.
pub mod br_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The twelve columns of the raw sales table, in API order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Product,
    Category,
    Price,
    Freight,
    PurchaseDate,
    Seller,
    Location,
    Rating,
    PaymentType,
    Installments,
    Latitude,
    Longitude,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Product,
        Column::Category,
        Column::Price,
        Column::Freight,
        Column::PurchaseDate,
        Column::Seller,
        Column::Location,
        Column::Rating,
        Column::PaymentType,
        Column::Installments,
        Column::Latitude,
        Column::Longitude,
    ];

    /// Header name as used by the API and in exported CSV files.
    pub fn header(self) -> &'static str {
        match self {
            Column::Product => "Produto",
            Column::Category => "Categoria do Produto",
            Column::Price => "Preço",
            Column::Freight => "Frete",
            Column::PurchaseDate => "Data da Compra",
            Column::Seller => "Vendedor",
            Column::Location => "Local da compra",
            Column::Rating => "Avaliação da compra",
            Column::PaymentType => "Tipo de pagamento",
            Column::Installments => "Quantidade de parcelas",
            Column::Latitude => "lat",
            Column::Longitude => "lon",
        }
    }

    /// Renders this column's cell for `record`. Dates are ISO `yyyy-mm-dd`
    /// and numbers always carry a decimal point.
    pub fn cell(self, record: &SaleRecord) -> String {
        match self {
            Column::Product => record.product.clone(),
            Column::Category => record.category.clone(),
            Column::Price => decimal_cell(record.price),
            Column::Freight => decimal_cell(record.freight),
            Column::PurchaseDate => record.purchase_date.format("%Y-%m-%d").to_string(),
            Column::Seller => record.seller.clone(),
            Column::Location => record.location.clone(),
            Column::Rating => record.rating.to_string(),
            Column::PaymentType => record.payment_type.clone(),
            Column::Installments => record.installments.to_string(),
            Column::Latitude => format!("{:?}", record.latitude),
            Column::Longitude => format!("{:?}", record.longitude),
        }
    }
}

fn decimal_cell(value: Decimal) -> String {
    let value = value.normalize();
    if value.scale() == 0 {
        format!("{}.0", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = anyhow::Error;

    /// Accepts the API header name or the snake_case English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let column = match wanted.to_lowercase().as_str() {
            "product" => Column::Product,
            "category" => Column::Category,
            "price" => Column::Price,
            "freight" => Column::Freight,
            "purchase_date" => Column::PurchaseDate,
            "seller" => Column::Seller,
            "location" => Column::Location,
            "rating" => Column::Rating,
            "payment_type" => Column::PaymentType,
            "installments" => Column::Installments,
            "latitude" => Column::Latitude,
            "longitude" => Column::Longitude,
            _ => Column::ALL
                .into_iter()
                .find(|c| c.header().eq_ignore_ascii_case(wanted))
                .ok_or_else(|| anyhow::anyhow!("unknown column: {}", wanted))?,
        };
        Ok(column)
    }
}
