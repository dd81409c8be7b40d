use proptest::prelude::*;
use simplejs_runtime::number::{number_to_string, string_to_number};
use simplejs_runtime::{Type, Value};

proptest! {
    #[test]
    fn finite_numbers_are_stored_bit_exact(d in any::<f64>().prop_filter("finite", |d| d.is_finite())) {
        let v = Value::make_number(d);
        prop_assert!(v.is_number());
        prop_assert_eq!(v.type_of(), Type::Number);
        prop_assert_eq!(v.as_number().to_bits(), d.to_bits());
        prop_assert_eq!(v.to_boolean(), d != 0.0);
    }
}

proptest! {
    #[test]
    fn every_nan_payload_is_canonical(bits in any::<u64>()) {
        let d = f64::from_bits(bits | 0x7ff0_0000_0000_0001);
        prop_assume!(d.is_nan());
        let v = Value::make_number(d);
        prop_assert_eq!(v, Value::NAN);
        prop_assert_eq!(v.type_of(), Type::NaN);
        prop_assert!(!v.to_boolean());
    }
}

proptest! {
    #[test]
    fn number_text_reparses_to_the_same_number(d in any::<f64>().prop_filter("finite", |d| d.is_finite())) {
        let text = number_to_string(d);
        let back = string_to_number(&text);
        if d == 0.0 {
            prop_assert_eq!(back, 0.0);
        } else {
            prop_assert_eq!(back.to_bits(), d.to_bits(), "{}", text);
        }
    }
}
