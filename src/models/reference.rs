//! 参考数据: 供应地、账单类型、付款方式

/// 组织所在国家的可选供应地
pub fn supply_regions(country: &str) -> Option<&'static [&'static str]> {
    match country {
        "India" => Some(INDIA_STATES),
        "United Arab Emirates" => Some(UAE_EMIRATES),
        _ => None,
    }
}

const INDIA_STATES: &[&str] = &[
    "AN", "AP", "AR", "AS", "BR", "CH", "CG", "DN", "DD", "DL", "GA", "GJ", "HR", "HP", "JK",
    "JH", "KA", "KL", "LA", "LD", "MP", "MH", "MN", "ML", "MZ", "NL", "OD", "PY", "PB", "RJ",
    "SK", "TN", "TS", "TR", "UP", "UK", "WB",
];

const UAE_EMIRATES: &[&str] = &[
    "Abu Dhabi",
    "Dubai",
    "Sharjah",
    "Ajman",
    "Umm Al-Quwain",
    "Fujairah",
    "Ras Al Khaimah",
];

pub const VALID_BILL_TYPES: &[&str] = &[
    "Registered",
    "Unregistered",
    "Composition",
    "Overseas",
    "SEZ",
    "Deemed Export",
];

pub const VALID_PAYMENT_MODES: &[&str] = &["Cash", "Credit"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_scoped_by_country() {
        assert!(supply_regions("India").unwrap().contains(&"KL"));
        assert!(!supply_regions("India").unwrap().contains(&"Dubai"));
        assert!(supply_regions("United Arab Emirates").unwrap().contains(&"Dubai"));
        assert!(supply_regions("Atlantis").is_none());
    }
}
