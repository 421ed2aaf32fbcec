use serde::{Deserialize, Deserializer, Serialize};

/// One listed website.
///
/// `url` identifies the site inside the catalog and the cart. Cart entries are
/// snapshots: re-importing the catalog does not touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub url: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub traffic: f64,
    /// Domain authority score
    #[serde(default, deserialize_with = "number_or_zero")]
    pub da: f64,
    #[serde(default)]
    pub email: String,
}

impl Site {
    pub fn new(url: impl Into<String>, price: f64, traffic: f64, da: f64) -> Self {
        Self {
            url: url.into(),
            price,
            traffic,
            da,
            email: String::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// Older listings were written with `null` where a number failed to parse.
fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Outcome of a successful catalog import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Number of sites now in the catalog
    pub count: usize,
    /// Rows dropped because their URL column was empty
    pub skipped: usize,
}

/// Outcome of a successful checkout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Receipt {
    pub amount_spent: f64,
    pub new_balance: f64,
    pub items: usize,
}
