use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_PREFIX, FactureError, Tariff, ValidationError};

/// Business, billing, email and appearance settings.
///
/// Serialized as one JSON object with the sections `company`, `billing`,
/// `email` and `appearance`. Missing keys take their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub company: Company,
    pub billing: Billing,
    pub email: EmailSettings,
    pub appearance: Appearance,
}

/// Identity block printed on every invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    /// French business registration number.
    pub siret: String,
    /// Intra-community VAT number.
    pub tva_number: String,
}

impl Default for Company {
    fn default() -> Self {
        Self {
            name: "VTC Service Pro".into(),
            address: "123 rue de Paris".into(),
            postal_code: "75000".into(),
            city: "Paris".into(),
            phone: "+33 6 12 34 56 78".into(),
            email: "contact@vtcpro.fr".into(),
            siret: "123 456 789 00000".into(),
            tva_number: "FR 12 345678900".into(),
        }
    }
}

/// Billing parameters. Rates are in euros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Billing {
    /// Hourly rate (€/h).
    pub default_rate: Decimal,
    /// Minimum fare per trip (€).
    pub min_fare: Decimal,
    /// VAT rate in percent (20 means 20 %).
    pub tva_rate: Decimal,
    /// Price per kilometre (€/km).
    pub km_rate: Decimal,
}

impl Default for Billing {
    fn default() -> Self {
        Self {
            default_rate: dec!(45.0),
            min_fare: dec!(15.0),
            tva_rate: dec!(20.0),
            km_rate: dec!(1.5),
        }
    }
}

impl Billing {
    /// VAT rate as a multiplier (0.20 for 20 %).
    pub fn tax_rate(&self) -> Decimal {
        self.tva_rate / dec!(100)
    }

    pub fn tariff(&self) -> Tariff {
        Tariff {
            hourly_rate: self.default_rate,
            min_fare: self.min_fare,
            km_rate: self.km_rate,
        }
    }
}

/// SMTP parameters for mailing invoices. Transport lives outside this crate.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub email_user: String,
    pub email_password: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_server: "smtp.gmail.com".into(),
            smtp_port: 587,
            email_user: String::new(),
            email_password: String::new(),
        }
    }
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("email_user", &self.email_user)
            .field("email_password", &"<redacted>")
            .finish()
    }
}

/// Invoice look and numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    /// `#RRGGBB`.
    pub primary_color: String,
    pub footer_text: String,
    pub invoice_prefix: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            primary_color: "#1E88E5".into(),
            footer_text: "Merci de votre confiance!".into(),
            invoice_prefix: DEFAULT_PREFIX.into(),
        }
    }
}

impl Appearance {
    /// Primary colour, or the default blue when the stored value is not `#RRGGBB`.
    pub fn primary_rgb(&self) -> Rgb {
        self.primary_color
            .parse()
            .unwrap_or_else(|_| Rgb::new(0x1E, 0x88, 0xE5))
    }
}

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `0.0..=1.0`, as PDF colour operators expect.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

impl std::str::FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("colour '{s}' must start with '#'"))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("colour '{s}' must be #RRGGBB"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("colour '{s}': {e}"))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Configuration {
    /// Check settings that would otherwise produce broken invoices.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.company.name.trim().is_empty() {
            errors.push(ValidationError::new(
                "company.name",
                "company name must not be empty",
            ));
        }

        let rates = [
            ("billing.default_rate", self.billing.default_rate),
            ("billing.min_fare", self.billing.min_fare),
            ("billing.tva_rate", self.billing.tva_rate),
            ("billing.km_rate", self.billing.km_rate),
        ];
        for (field, value) in rates {
            if value.is_sign_negative() && !value.is_zero() {
                errors.push(ValidationError::new(field, "must not be negative"));
            }
        }

        if let Err(e) = self.appearance.primary_color.parse::<Rgb>() {
            errors.push(ValidationError::new("appearance.primary_color", e));
        }
        if self.appearance.invoice_prefix.trim().is_empty() {
            errors.push(ValidationError::new(
                "appearance.invoice_prefix",
                "invoice prefix must not be empty",
            ));
        }

        errors
    }

    /// Like [`validate`](Self::validate), folded into a `FactureError::Config`.
    pub fn check(&self) -> Result<(), FactureError> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(FactureError::Config(msg))
    }
}
