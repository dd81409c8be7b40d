use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use simplejs_lexer::{Lexer, normalize_source};
use simplejs_syntax::TokenKind;

fn any_js_like() -> impl Strategy<Value = String> {
    let ascii =
        proptest::collection::vec(any::<char>().prop_filter("ascii", |c| c.is_ascii()), 0..40)
            .prop_map(|v| v.into_iter().collect::<String>());
    let unicode = proptest::collection::vec(
        any::<char>().prop_filter("non-ascii", |c| !c.is_ascii()),
        0..20,
    )
    .prop_map(|v| v.into_iter().collect::<String>());
    let sym = "€ \u{2028} ;()[]{}?/* */ // \"\\ ' \n \t . === !== => ++ -- 0x 1e+ .5 var function if else while for return break continue throw try catch finally new this typeof"
        .to_string();
    (ascii, unicode, any::<bool>(), any::<bool>()).prop_map(move |(a, b, f1, f2)| {
        let mut s = String::new();
        if f1 {
            s.push_str(&sym);
        }
        s.push_str(&a);
        s.push_str(&b);
        if f2 {
            s.push_str(&sym);
        }
        s.chars().take(200).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, max_shrink_iters: 200, .. ProptestConfig::default()
    })]
    #[test]
    fn lex_random_input_should_not_panic(s in any_js_like()) {
        let normalized = normalize_source(&s);
        let result = Lexer::new(&normalized.text).lex();
        prop_assert!(matches!(result.tokens.last().map(|t| t.kind), Some(TokenKind::Eof)));
        for t in &result.tokens {
            prop_assert!(t.span.end.0 as usize <= normalized.text.len());
        }
    }
}
