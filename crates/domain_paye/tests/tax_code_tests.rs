//! Tax code parsing and validation tests

use domain_paye::tax_code::{TaxCodeParser, MARRIAGE_ALLOWANCE_TRANSFER};
use domain_paye::{
    parse, validate_tax_code, Allowance, PayeError, Region, SpecialRate, TaxYearConfig,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod parsing {
    use super::*;

    #[test]
    fn test_standard_code_descriptor() {
        let descriptor = parse("1257L");
        assert_eq!(descriptor.code, "1257L");
        assert_eq!(descriptor.base_allowance, Allowance::Amount(dec!(12570)));
        assert_eq!(descriptor.region, Region::Uk);
        assert_eq!(descriptor.special_rate, None);
        assert!(!descriptor.is_non_cumulative);
        assert!(!descriptor.is_negative_allowance);
    }

    #[test]
    fn test_scottish_code_keeps_allowance() {
        let descriptor = parse("S1257L");
        assert_eq!(descriptor.region, Region::Scotland);
        assert_eq!(descriptor.base_allowance, Allowance::Amount(dec!(12570)));
    }

    #[test]
    fn test_special_codes() {
        assert_eq!(parse("br").special_rate, Some(SpecialRate::BR));
        assert_eq!(parse("NT").base_allowance, Allowance::Unlimited);
        assert_eq!(parse("C0T").special_rate, Some(SpecialRate::ZeroT));
        assert_eq!(parse("C0T").region, Region::Wales);
    }

    #[test]
    fn test_k_code_is_negative() {
        let descriptor = parse("K500");
        assert!(descriptor.is_negative_allowance);
        assert_eq!(descriptor.base_allowance, Allowance::Amount(dec!(-5000)));
    }

    #[test]
    fn test_marriage_allowance_is_informational() {
        let descriptor = parse("1383M");
        assert_eq!(descriptor.marriage_allowance_delta, MARRIAGE_ALLOWANCE_TRANSFER);
        // The numeric part already includes the transfer
        assert_eq!(descriptor.base_allowance, Allowance::Amount(dec!(13830)));
    }

    #[test]
    fn test_month_one_marker_does_not_count_as_marriage_letter() {
        let descriptor = parse("1257L M1");
        assert!(descriptor.is_non_cumulative);
        assert!(!descriptor.has_marriage_allowance_adjustment);
        assert_eq!(descriptor.marriage_allowance_delta, Decimal::ZERO);
    }

    #[test]
    fn test_parser_uses_year_defaults() {
        let parser = TaxYearConfig::default().tax_code_parser();
        assert_eq!(parser.parse("").base_allowance, Allowance::Amount(dec!(12570)));

        let custom = TaxCodeParser::new(dec!(10000), dec!(1000));
        assert_eq!(custom.parse("L").base_allowance, Allowance::Amount(dec!(10000)));
        assert_eq!(custom.parse("1100N").marriage_allowance_delta, dec!(-1000));
    }

    #[test]
    fn test_descriptor_serializes_snake_case() {
        let json = serde_json::to_value(parse("SK100 W1")).unwrap();
        assert_eq!(json["region"], "uk");
        assert_eq!(json["is_non_cumulative"], true);
        assert_eq!(json["base_allowance"]["kind"], "amount");
        assert_eq!(json["base_allowance"]["amount"], "-1000");

        let nt = serde_json::to_value(parse("NT")).unwrap();
        assert_eq!(nt["special_rate"], "NT");
        assert_eq!(nt["base_allowance"]["kind"], "unlimited");
    }
}

mod validation {
    use super::*;

    #[test]
    fn test_accepts_well_formed_codes() {
        let codes = [
            "1257L", "s1257l", "C1257L", "K475", "SK475", "CK475T", "BR", "SD0", "0T", "1257L W1",
            "1257L/M1", "1257LX",
        ];
        for code in codes {
            assert!(validate_tax_code(code).is_ok(), "{code}");
        }
    }

    #[test]
    fn test_rejects_malformed_codes() {
        for code in ["12570L", "L", "1257", "1257Z", "K", "KK100", "hello"] {
            assert!(
                matches!(validate_tax_code(code), Err(PayeError::InvalidTaxCode(_))),
                "{code}"
            );
        }
    }

    #[test]
    fn test_empty_code_is_required() {
        assert_eq!(
            validate_tax_code("   "),
            Err(PayeError::Validation("Tax code is required".to_string()))
        );
    }
}

mod description {
    use super::*;

    #[test]
    fn test_describes_special_codes() {
        assert_eq!(parse("BR").describe(), "All income taxed at the basic rate.");
        assert_eq!(parse("NT").describe(), "No tax will be deducted.");
        assert_eq!(parse("C0T").describe(), "Welsh rates apply. No personal allowance.");
    }

    #[test]
    fn test_describes_marriage_allowance() {
        assert_eq!(
            parse("1383M").describe(),
            "Personal allowance of £13,830.00. Received marriage allowance from partner."
        );
        assert_eq!(
            parse("1131N").describe(),
            "Personal allowance of £11,310.00. Transferred marriage allowance to partner."
        );
    }
}
