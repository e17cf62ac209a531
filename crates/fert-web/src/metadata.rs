use fert_core::metrics::display_rounded;
use fert_core::{DerivedMetrics, OutputConfig, TokenRecord};
use serde::{Deserialize, Serialize};

pub const DESCRIPTION: &str = "A trusty constituent of any Farmer's toolbox, ERC-1155 FERT has been known to spur new growth on seemingly dead farms. Once purchased and deployed into fertile ground by Farmers, Fertilizer generates new Sprouts: future Beans yet to be repaid by Beanstalk in exchange for doing the work of Replanting the protocol.";

/// ERC-1155 metadata document served for one token id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
    pub value: AttributeValue,
}

/// Integral values are kept integral so `500` is not written as `500.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Number(f64),
}

impl AttributeValue {
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            AttributeValue::Integer(value as i64)
        } else {
            AttributeValue::Number(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            AttributeValue::Integer(value) => *value as f64,
            AttributeValue::Number(value) => *value,
        }
    }
}

impl Attribute {
    fn new(trait_type: &str, display_type: Option<&str>, value: AttributeValue) -> Self {
        Self {
            trait_type: trait_type.into(),
            display_type: display_type.map(Into::into),
            value,
        }
    }
}

impl TokenMetadata {
    pub fn attribute(&self, trait_type: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.trait_type == trait_type)
    }
}

pub fn build_metadata(
    token: &TokenRecord,
    metrics: &DerivedMetrics,
    output_id: &str,
    config: &OutputConfig,
) -> TokenMetadata {
    let mut attributes = vec![
        Attribute::new(
            "Season",
            None,
            AttributeValue::Integer(i64::from(token.season)),
        ),
        Attribute::new(
            "Humidity",
            Some("boost_percentage"),
            AttributeValue::from_f64(config.humidity_scale.apply(token.humidity)),
        ),
        Attribute::new(
            "BPF Remaining",
            Some("boost_number"),
            AttributeValue::from_f64(display_rounded(metrics.remaining)),
        ),
    ];
    if config.record_updated_at {
        if let Some(observed_at) = metrics.observed_at {
            attributes.push(Attribute::new(
                "Updated At",
                Some("date"),
                AttributeValue::Integer(observed_at.timestamp()),
            ));
        }
    }
    TokenMetadata {
        name: format!("Fertilizer - {}", token.id),
        description: DESCRIPTION.into(),
        image: format!("{}/{output_id}.svg", config.base_url),
        external_url: config
            .emit_pages
            .then(|| format!("{}/{output_id}.html", config.base_url)),
        attributes,
    }
}
