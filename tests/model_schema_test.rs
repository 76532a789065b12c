use std::collections::HashSet;
use yijia_catalog::{
    mock_institutions, Booking, BookingStatus, Catalog, Contract, ContractStatus, Institution,
    ViewType, PRIMARY_COLOR,
};

/// 機構資料以 JSON 往返後欄位完全一致
#[test]
fn test_every_seed_record_round_trips() {
    for inst in mock_institutions() {
        let json = serde_json::to_string(&inst).unwrap();
        let back: Institution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inst);
    }
}

#[test]
fn test_seed_invariants() {
    let seed = mock_institutions();
    let ids: HashSet<&str> = seed.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), seed.len());

    for inst in &seed {
        assert!(inst.price_range.min() <= inst.price_range.max());
        assert!((0.0..=5.0).contains(&inst.rating));
        assert!(!inst.name.is_empty());
    }
    assert_eq!(PRIMARY_COLOR, "#3072F6");
}

#[test]
fn test_wire_format_matches_source_schema() {
    let json = serde_json::json!({
        "id": "7",
        "name": "测试养老院",
        "image": "https://example.com/a.jpg",
        "priceRange": [5000, 9000],
        "location": "北京市海淀区",
        "rating": 4.2,
        "tags": [],
        "careTypes": ["介护"],
        "features": [],
        "description": "",
        "isVR": false,
        "isLive": false,
        "originalPrice": 5600,
        "offerDeadline": "2026-11-11 23:59:59"
    });

    let inst: Institution = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(inst.original_price, Some(5600));
    assert_eq!(inst.discount(), Some(600));
    assert!(inst.offer_deadline_at().is_some());
    assert_eq!(serde_json::to_value(&inst).unwrap(), json);
}

#[test]
fn test_contract_and_booking_status_membership() {
    let contract_json = r##"{"id":"c1","title":"养老服务合同","inst":"泰康之家·燕园","date":"2024-05-01","status":"签署中","color":"#3072F6","bg":"#EBF1FE"}"##;
    let contract: Contract = serde_json::from_str(contract_json).unwrap();
    assert_eq!(contract.status, ContractStatus::Signing);
    assert!(contract.styling_consistent());

    let names: HashSet<&str> = ContractStatus::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(names, HashSet::from(["待签署", "已签署", "签署中"]));

    let names: HashSet<&str> = BookingStatus::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(names, HashSet::from(["待确认", "待参观", "已完成", "已取消"]));

    let booking = Booking {
        id: "b1".to_string(),
        institution_name: "远洋·椿萱茂（亦庄）".to_string(),
        date: "2024-06-01".to_string(),
        status: BookingStatus::Cancelled,
    };
    let value = serde_json::to_value(&booking).unwrap();
    assert_eq!(value["institutionName"], "远洋·椿萱茂（亦庄）");
    assert_eq!(value["status"], "已取消");
}

#[test]
fn test_catalog_views_resolve_to_view_types() {
    // 目錄查詢對應的畫面都必須存在於 ViewType
    for name in ["SEARCH", "VR_LIST", "LIVE_LIST", "OFFER_LIST", "COMPARISON", "BRAND_DETAIL"] {
        assert!(name.parse::<ViewType>().is_ok(), "{}", name);
    }

    let catalog = Catalog::seed();
    assert_eq!(catalog.compare(&["2", "1"]).unwrap().len(), 2);
}
