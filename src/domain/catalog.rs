use crate::domain::model::Institution;
use crate::domain::seed::mock_institutions;
use crate::utils::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// 評分由高到低
    Rating,
    /// 起始月費由低到高
    PriceLow,
    /// 最高月費由高到低
    PriceHigh,
    /// 距離由近到遠，未知距離排最後
    Distance,
}

/// Filters for `Catalog::search`. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionQuery {
    pub keyword: Option<String>,
    #[serde(default)]
    pub care_types: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    #[serde(default)]
    pub vr_only: bool,
    #[serde(default)]
    pub live_only: bool,
    pub min_rating: Option<f64>,
    pub sort: Option<SortKey>,
    pub limit: Option<usize>,
}

impl InstitutionQuery {
    pub fn is_empty(&self) -> bool {
        *self == InstitutionQuery::default()
    }

    pub fn matches(&self, institution: &Institution) -> bool {
        if self.vr_only && !institution.is_vr {
            return false;
        }
        if self.live_only && !institution.is_live {
            return false;
        }
        if let Some(min_rating) = self.min_rating {
            if institution.rating < min_rating {
                return false;
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let min = self.min_price.unwrap_or(0);
            let max = self.max_price.unwrap_or(u32::MAX);
            if !institution.price_range.overlaps(min, max) {
                return false;
            }
        }
        if !self
            .care_types
            .iter()
            .all(|care| institution.provides_care(care))
        {
            return false;
        }
        if !self
            .tags
            .iter()
            .all(|tag| institution.tags.iter().any(|t| t == tag))
        {
            return false;
        }
        match self.keyword.as_deref().map(str::trim) {
            Some(keyword) if !keyword.is_empty() => keyword_matches(institution, keyword),
            _ => true,
        }
    }
}

fn keyword_matches(institution: &Institution, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    hit(&institution.name)
        || institution.brand_name.as_deref().is_some_and(hit)
        || hit(&institution.location)
        || hit(&institution.description)
        || institution.tags.iter().any(|t| hit(t))
        || institution.features.iter().any(|f| hit(f))
}

fn compare_by(key: SortKey, a: &Institution, b: &Institution) -> Ordering {
    match key {
        SortKey::Rating => b.rating.total_cmp(&a.rating),
        SortKey::PriceLow => a.price_range.min().cmp(&b.price_range.min()),
        SortKey::PriceHigh => b.price_range.max().cmp(&a.price_range.max()),
        SortKey::Distance => match (a.distance_km(), b.distance_km()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Read-only view over a list of institutions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    institutions: Vec<Institution>,
}

impl Catalog {
    pub fn new(institutions: Vec<Institution>) -> Self {
        Self { institutions }
    }

    pub fn seed() -> Self {
        Self::new(mock_institutions())
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Institution> {
        self.institutions.iter()
    }

    pub fn into_inner(self) -> Vec<Institution> {
        self.institutions
    }

    pub fn find(&self, id: &str) -> Option<&Institution> {
        self.institutions.iter().find(|i| i.id == id)
    }

    /// 品牌清單，依首次出現順序
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for brand in self.institutions.iter().filter_map(|i| i.brand_name.as_deref()) {
            if !brands.contains(&brand) {
                brands.push(brand);
            }
        }
        brands
    }

    pub fn by_brand(&self, brand: &str) -> Vec<&Institution> {
        self.institutions
            .iter()
            .filter(|i| i.brand_name.as_deref() == Some(brand))
            .collect()
    }

    pub fn vr_listings(&self) -> Vec<&Institution> {
        self.institutions.iter().filter(|i| i.is_vr).collect()
    }

    pub fn live_listings(&self) -> Vec<&Institution> {
        self.institutions.iter().filter(|i| i.is_live).collect()
    }

    pub fn offers(&self) -> Vec<&Institution> {
        self.institutions.iter().filter(|i| i.has_offer()).collect()
    }

    pub fn search(&self, query: &InstitutionQuery) -> Vec<&Institution> {
        let mut results: Vec<&Institution> = self
            .institutions
            .iter()
            .filter(|i| query.matches(i))
            .collect();

        if let Some(key) = query.sort {
            results.sort_by(|a, b| compare_by(key, a, b));
        }
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        tracing::debug!(matched = results.len(), total = self.len(), "Catalog search");
        results
    }

    /// Side-by-side comparison in the requested order.
    pub fn compare(&self, ids: &[&str]) -> Result<Vec<&Institution>> {
        ids.iter()
            .map(|id| {
                self.find(id).ok_or_else(|| CatalogError::NotFound {
                    id: id.to_string(),
                })
            })
            .collect()
    }
}

impl From<Vec<Institution>> for Catalog {
    fn from(institutions: Vec<Institution>) -> Self {
        Self::new(institutions)
    }
}
