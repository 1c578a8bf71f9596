use serde::{Deserialize, Serialize};

/// One-time new-customer discount entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountState {
    pub eligible: bool,
    pub used: bool,
    pub applied: bool,
}

impl Default for DiscountState {
    fn default() -> Self {
        Self {
            eligible: true,
            used: false,
            applied: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub contact: String,
    pub code: String,
    #[serde(default)]
    pub discount: DiscountState,
    #[serde(default)]
    pub created_at: String,
}

impl CustomerIdentity {
    pub fn key(&self) -> String {
        customer_key(&self.name, &self.contact)
    }
}

/// Normalized registry key: lowercase `name-contact`.
pub fn customer_key(name: &str, contact: &str) -> String {
    format!("{}-{}", name.trim(), contact.trim()).to_lowercase()
}
