use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// 常見照護等級
pub const SELF_CARE: &str = "自理";
pub const ASSISTED: &str = "介助";
pub const NURSING: &str = "介护";
pub const DEMENTIA: &str = "认知症专项";

/// Monthly price bounds in yuan, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange(pub u32, pub u32);

impl PriceRange {
    pub fn min(&self) -> u32 {
        self.0
    }

    pub fn max(&self) -> u32 {
        self.1
    }

    pub fn is_ordered(&self) -> bool {
        self.0 <= self.1
    }

    pub fn contains(&self, price: u32) -> bool {
        self.0 <= price && price <= self.1
    }

    /// Whether any price in this range falls inside `[min, max]`.
    pub fn overlaps(&self, min: u32, max: u32) -> bool {
        self.0 <= max && min <= self.1
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// One elder-care facility listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    pub image: String,
    pub price_range: PriceRange,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    pub rating: f64,
    pub tags: Vec<String>,
    pub care_types: Vec<String>,
    pub features: Vec<String>,
    pub description: String,
    #[serde(rename = "isVR")]
    pub is_vr: bool,
    pub is_live: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_deadline: Option<String>,
}

impl Institution {
    pub fn has_offer(&self) -> bool {
        self.original_price.is_some()
    }

    /// 優惠金額：原價減去起始月費
    pub fn discount(&self) -> Option<u32> {
        self.original_price
            .filter(|original| *original > self.price_range.min())
            .map(|original| original - self.price_range.min())
    }

    /// Parses `offerDeadline` as RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare date
    /// (treated as the end of that day, UTC).
    pub fn offer_deadline_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.offer_deadline.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .map(|naive| naive.and_utc())
    }

    pub fn offer_expired(&self, now: DateTime<Utc>) -> bool {
        self.offer_deadline_at()
            .map(|deadline| deadline <= now)
            .unwrap_or(false)
    }

    /// `"3.5km"` → 3.5, `"800m"` → 0.8; anything else is unknown.
    pub fn distance_km(&self) -> Option<f64> {
        let raw = self.distance.as_deref()?.trim().to_ascii_lowercase();

        let (number, divisor) = if let Some(km) = raw.strip_suffix("km") {
            (km, 1.0)
        } else if let Some(m) = raw.strip_suffix('m') {
            (m, 1000.0)
        } else {
            (raw.as_str(), 1.0)
        };

        number
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map(|value| value / divisor)
    }

    pub fn provides_care(&self, care_type: &str) -> bool {
        self.care_types.iter().any(|c| c == care_type)
    }

    /// 清理字串欄位並移除重複標籤，保留首次出現的順序
    pub fn normalized(mut self) -> Self {
        fn dedup(values: Vec<String>) -> Vec<String> {
            let mut seen = HashSet::new();
            values
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && seen.insert(v.clone()))
                .collect()
        }

        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        self.location = self.location.trim().to_string();
        self.description = self.description.trim().to_string();
        self.brand_name = self
            .brand_name
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        self.tags = dedup(self.tags);
        self.care_types = dedup(self.care_types);
        self.features = dedup(self.features);
        self
    }

    fn label(&self) -> String {
        if self.id.is_empty() {
            self.name.clone()
        } else {
            self.id.clone()
        }
    }
}

impl Validate for Institution {
    fn validate(&self) -> Result<()> {
        let record = self.label();
        let wrap = |e: CatalogError| CatalogError::validation(record.clone(), e.to_string());

        validate_non_empty_string("id", &self.id).map_err(wrap)?;
        validate_non_empty_string("name", &self.name).map_err(wrap)?;
        validate_url("image", &self.image).map_err(wrap)?;

        if !self.price_range.is_ordered() {
            return Err(CatalogError::validation(
                record,
                format!(
                    "priceRange min {} exceeds max {}",
                    self.price_range.min(),
                    self.price_range.max()
                ),
            ));
        }

        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(CatalogError::validation(
                record,
                format!("rating {} outside [0, 5]", self.rating),
            ));
        }

        if let Some(original) = self.original_price {
            if original < self.price_range.min() {
                return Err(CatalogError::validation(
                    record,
                    format!(
                        "originalPrice {} below starting price {}",
                        original,
                        self.price_range.min()
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Validates every record and rejects duplicate ids.
pub fn validate_catalog(institutions: &[Institution]) -> Result<()> {
    let mut seen = HashSet::new();
    for institution in institutions {
        institution.validate()?;
        if !seen.insert(institution.id.as_str()) {
            return Err(CatalogError::DuplicateIdError {
                id: institution.id.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    #[serde(rename = "待签署")]
    PendingSignature,
    #[serde(rename = "已签署")]
    Signed,
    #[serde(rename = "签署中")]
    Signing,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 3] = [
        ContractStatus::PendingSignature,
        ContractStatus::Signed,
        ContractStatus::Signing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::PendingSignature => "待签署",
            ContractStatus::Signed => "已签署",
            ContractStatus::Signing => "签署中",
        }
    }

    /// 狀態對應的 (文字色, 背景色)
    pub fn palette(&self) -> (&'static str, &'static str) {
        match self {
            ContractStatus::PendingSignature => ("#F59E0B", "#FEF3C7"),
            ContractStatus::Signed => ("#10B981", "#D1FAE5"),
            ContractStatus::Signing => (super::seed::PRIMARY_COLOR, "#EBF1FE"),
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        ContractStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownVariant {
                kind: "contract status",
                value: s.to_string(),
            })
    }
}

/// A tenancy or service agreement between a user and an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub title: String,
    pub inst: String,
    pub date: String,
    pub status: ContractStatus,
    pub color: String,
    pub bg: String,
}

impl Contract {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        inst: impl Into<String>,
        date: impl Into<String>,
        status: ContractStatus,
    ) -> Self {
        let (color, bg) = status.palette();
        Self {
            id: id.into(),
            title: title.into(),
            inst: inst.into(),
            date: date.into(),
            status,
            color: color.to_string(),
            bg: bg.to_string(),
        }
    }

    pub fn styling_consistent(&self) -> bool {
        let (color, bg) = self.status.palette();
        self.color.eq_ignore_ascii_case(color) && self.bg.eq_ignore_ascii_case(bg)
    }
}

impl Validate for Contract {
    fn validate(&self) -> Result<()> {
        let wrap = |e: CatalogError| CatalogError::validation(self.id.clone(), e.to_string());
        validate_non_empty_string("id", &self.id).map_err(wrap)?;
        validate_non_empty_string("title", &self.title).map_err(wrap)?;

        if !self.styling_consistent() {
            tracing::warn!(
                contract = %self.id,
                status = %self.status,
                "Contract styling ({}, {}) does not match its status",
                self.color,
                self.bg
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "待确认")]
    PendingConfirmation,
    #[serde(rename = "待参观")]
    PendingVisit,
    #[serde(rename = "已完成")]
    Completed,
    #[serde(rename = "已取消")]
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::PendingConfirmation,
        BookingStatus::PendingVisit,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingConfirmation => "待确认",
            BookingStatus::PendingVisit => "待参观",
            BookingStatus::Completed => "已完成",
            BookingStatus::Cancelled => "已取消",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownVariant {
                kind: "booking status",
                value: s.to_string(),
            })
    }
}

/// A scheduled visit to an institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub institution_name: String,
    pub date: String,
    pub status: BookingStatus,
}

macro_rules! view_types {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Application screens.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ViewType {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl ViewType {
            pub const ALL: &'static [ViewType] = &[$(ViewType::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ViewType::$variant => $name,)+
                }
            }
        }
    };
}

view_types! {
    Onboarding => "ONBOARDING",
    Login => "LOGIN",
    Register => "REGISTER",
    Home => "HOME",
    Search => "SEARCH",
    Detail => "DETAIL",
    Tools => "TOOLS",
    Signing => "SIGNING",
    Messages => "MESSAGES",
    Profile => "PROFILE",
    Settings => "SETTINGS",
    MapSearch => "MAP_SEARCH",
    VrList => "VR_LIST",
    VrPlayer => "VR_PLAYER",
    LiveList => "LIVE_LIST",
    LivePlayer => "LIVE_PLAYER",
    OfferList => "OFFER_LIST",
    PriceCalculator => "PRICE_CALCULATOR",
    Comparison => "COMPARISON",
    Checklist => "CHECKLIST",
    Policy => "POLICY",
    Relocation => "RELOCATION",
    Collection => "COLLECTION",
    History => "HISTORY",
    MyReviews => "MY_REVIEWS",
    Following => "FOLLOWING",
    BookingList => "BOOKING_LIST",
    OnlineContract => "ONLINE_CONTRACT",
    PaymentRecords => "PAYMENT_RECORDS",
    HealthArchive => "HEALTH_ARCHIVE",
    MyComplaints => "MY_COMPLAINTS",
    ContractDetail => "CONTRACT_DETAIL",
    Chat => "CHAT",
    BrandDetail => "BRAND_DETAIL",
    SurroundingsMap => "SURROUNDINGS_MAP",
    CareServices => "CARE_SERVICES",
    OnlineBooking => "ONLINE_BOOKING",
    AiResults => "AI_RESULTS",
    BookingForm => "BOOKING_FORM",
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        ViewType::ALL
            .iter()
            .copied()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownVariant {
                kind: "view",
                value: s.to_string(),
            })
    }
}

/// Rendered outputs of one export run.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub institutions: Vec<Institution>,
    pub json_output: String,
    pub csv_output: String,
    pub tsv_output: String,
}
