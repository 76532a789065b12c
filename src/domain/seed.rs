use crate::domain::model::{Institution, PriceRange};

/// 品牌主色
pub const PRIMARY_COLOR: &str = "#3072F6";

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Demo listings for development. Not live data and not validated here.
pub fn mock_institutions() -> Vec<Institution> {
    vec![
        Institution {
            id: "1".to_string(),
            name: "泰康之家·燕园".to_string(),
            brand_name: Some("泰康之家".to_string()),
            image: "https://images.unsplash.com/photo-1598928506311-c55ded91a20c?q=80&w=800&auto=format&fit=crop".to_string(),
            price_range: PriceRange(8000, 25000),
            location: "北京市昌平区科技园区".to_string(),
            distance: Some("3.5km".to_string()),
            rating: 4.9,
            tags: labels(&["全托", "社保", "长护险", "医养结合", "CCRC社区"]),
            care_types: labels(&["自理", "介助", "介护"]),
            features: labels(&["24h呼叫", "智能床位", "适老化家具"]),
            description: "泰康之家·燕园位于北京昌平新城核心区，是国内首家大规模、全功能、医养结合、候鸟连锁的中高端养老社区。".to_string(),
            is_vr: true,
            is_live: true,
            original_price: None,
            offer_deadline: None,
        },
        Institution {
            id: "2".to_string(),
            name: "远洋·椿萱茂（亦庄）".to_string(),
            brand_name: Some("椿萱茂".to_string()),
            image: "https://images.unsplash.com/photo-1513694203232-719a280e022f?q=80&w=800&auto=format&fit=crop".to_string(),
            price_range: PriceRange(12000, 30000),
            location: "北京市大兴区亦庄开发区".to_string(),
            distance: Some("12km".to_string()),
            rating: 4.7,
            tags: labels(&["全托", "长护险", "认知症护理", "美式养老"]),
            care_types: labels(&["介护", "认知症专项"]),
            features: labels(&["防滑地砖", "圆角家具", "专业社工"]),
            description: "椿萱茂致力于为长辈提供\"高品质养老服务\"，引入美式先进养老理念，特别是在失智照护领域处于国内领先地位。".to_string(),
            is_vr: true,
            is_live: false,
            original_price: None,
            offer_deadline: None,
        },
        Institution {
            id: "3".to_string(),
            name: "万科·随园（房山）".to_string(),
            brand_name: Some("万科随园".to_string()),
            image: "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?q=80&w=800&auto=format&fit=crop".to_string(),
            price_range: PriceRange(7000, 15000),
            location: "北京市房山区良乡".to_string(),
            distance: Some("25km".to_string()),
            rating: 4.8,
            tags: labels(&["半托", "社保", "社区化养老", "大型绿化"]),
            care_types: labels(&["自理", "介助"]),
            features: labels(&["厨卫齐全", "共享客厅", "紧急拉绳"]),
            description: "万科旗下高品质康养社区，环境优美，配套齐全，倡导\"邻里式\"养老，让长辈在自然中安享晚年。".to_string(),
            is_vr: false,
            is_live: true,
            original_price: None,
            offer_deadline: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::validate_catalog;
    use std::collections::HashSet;

    #[test]
    fn test_seed_order_and_ids() {
        let ids: Vec<String> = mock_institutions().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_seed_price_ranges_are_ordered() {
        for inst in mock_institutions() {
            assert!(inst.price_range.min() <= inst.price_range.max(), "{}", inst.id);
        }
        assert_eq!(mock_institutions()[0].price_range, PriceRange(8000, 25000));
    }

    #[test]
    fn test_seed_ratings_in_bounds() {
        let ratings: Vec<f64> = mock_institutions().iter().map(|i| i.rating).collect();
        assert_eq!(ratings, vec![4.9, 4.7, 4.8]);
        assert!(ratings.iter().all(|r| (0.0..=5.0).contains(r)));
    }

    #[test]
    fn test_seed_passes_ingestion_validation() {
        assert!(validate_catalog(&mock_institutions()).is_ok());
    }

    #[test]
    fn test_primary_color() {
        assert_eq!(PRIMARY_COLOR, "#3072F6");
    }
}
