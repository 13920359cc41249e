//! Pseudo-class state selectors and their cascade ranking.

use super::CssMap;

/// A pseudo-class or ARIA state that a style set or box can react to.
///
/// Each state is declared in a config under a `__`-prefixed key
/// (`__hover`, `__focusVisible`, ...) and emitted under a fixed selector
/// that covers both the native pseudo-class and its ARIA equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Hover,
    Active,
    Focus,
    FocusVisible,
    Checked,
    Pressed,
    Current,
    Invalid,
    Disabled,
}

impl State {
    /// Emission order for state blocks inside a color, border or font set.
    pub const SET_ORDER: [State; 9] = [
        State::Hover,
        State::Active,
        State::Focus,
        State::FocusVisible,
        State::Checked,
        State::Pressed,
        State::Current,
        State::Invalid,
        State::Disabled,
    ];

    /// Order in which a box's state blocks are pushed to the front of its
    /// rule list. The last state pushed ends up first.
    pub const BOX_ORDER: [State; 9] = [
        State::Hover,
        State::Active,
        State::Focus,
        State::FocusVisible,
        State::Checked,
        State::Disabled,
        State::Invalid,
        State::Pressed,
        State::Current,
    ];

    /// The config key this state is declared under.
    pub const fn key(self) -> &'static str {
        match self {
            State::Hover => "__hover",
            State::Active => "__active",
            State::Focus => "__focus",
            State::FocusVisible => "__focusVisible",
            State::Checked => "__checked",
            State::Pressed => "__pressed",
            State::Current => "__current",
            State::Invalid => "__invalid",
            State::Disabled => "__disabled",
        }
    }

    /// The nested selector the state's declarations are emitted under.
    pub const fn selector(self) -> &'static str {
        match self {
            State::Invalid => {
                "&:invalid,&[aria-invalid=true],&[aria-invalid=grammar],&[aria-invalid=spelling]"
            }
            State::Checked => "&:checked,&[aria-checked=true],&[aria-checked=mixed]",
            State::Pressed => "&[aria-pressed=true],&[aria-pressed=mixed]",
            State::Current => concat!(
                "&[aria-current=true],&[aria-current=page],&[aria-current=step],",
                "&[aria-current=location],&[aria-current=date],&[aria-current=time]"
            ),
            State::Focus => "&:focus,&:focus-within",
            State::FocusVisible => "&:focus-visible",
            State::Hover => "&:hover",
            State::Active => "&:active",
            State::Disabled => "&:disabled,&[aria-disabled=true]",
        }
    }
}

/// Selector for text selection colors.
pub const SELECTION_SELECTOR: &str = "&::selection";

/// Rank words in ascending cascade priority.
///
/// A later word wins over an earlier one when several states apply at once:
/// `active` beats `hover`, and `disabled` beats everything.
const SPECIFICITY: [&str; 9] = [
    "checked",
    "invalid",
    "pressed",
    "current",
    "focus",
    "focus-visible",
    "hover",
    "active",
    "disabled",
];

/// Ranks a top-level key by the first rank word it contains.
///
/// Plain declarations and pseudo-elements contain none and rank `None`,
/// which sorts before every state selector.
pub fn specificity(key: &str) -> Option<usize> {
    SPECIFICITY.iter().position(|word| key.contains(word))
}

/// Reorders the top-level entries of `map` by [`specificity`].
///
/// The sort is stable: keys of equal rank keep their relative order.
pub fn sort_by_specificity(map: &mut CssMap) {
    map.sort_by(|a, _, b, _| specificity(a).cmp(&specificity(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::CssValue;
    use proptest::prelude::*;

    fn keys(map: &CssMap) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_plain_keys_rank_first() {
        assert_eq!(specificity("color"), None);
        assert_eq!(specificity("&::before"), None);
        assert_eq!(specificity("@supports not (backdrop-filter: blur(1px))"), None);
        assert_eq!(specificity(State::Checked.selector()), Some(0));
        assert_eq!(specificity(State::Disabled.selector()), Some(8));
    }

    #[test]
    fn test_focus_visible_shares_focus_rank() {
        assert_eq!(
            specificity(State::FocusVisible.selector()),
            specificity(State::Focus.selector())
        );
    }

    #[test]
    fn test_sort_orders_states() {
        let mut map = CssMap::new();
        for state in [State::Disabled, State::Active, State::Hover, State::Checked] {
            map.insert(state.selector().to_string(), CssValue::Block(CssMap::new()));
        }
        map.insert("color".into(), CssValue::from("red"));
        sort_by_specificity(&mut map);
        assert_eq!(
            keys(&map),
            vec![
                "color",
                State::Checked.selector(),
                State::Hover.selector(),
                State::Active.selector(),
                State::Disabled.selector(),
            ]
        );
    }

    proptest! {
        /// The emitted order never depends on the declaration order.
        #[test]
        fn sort_is_independent_of_declaration_order(
            order in Just(State::SET_ORDER.to_vec()).prop_shuffle()
        ) {
            let mut map = CssMap::new();
            for state in &order {
                map.insert(state.selector().to_string(), CssValue::Block(CssMap::new()));
            }
            sort_by_specificity(&mut map);
            let ranks: Vec<_> = map.keys().map(|k| specificity(k)).collect();
            let mut sorted = ranks.clone();
            sorted.sort();
            prop_assert_eq!(ranks, sorted);

            let position = |s: State| map.get_index_of(s.selector()).unwrap();
            prop_assert!(position(State::Checked) < position(State::Hover));
            prop_assert!(position(State::Hover) < position(State::Active));
            prop_assert!(position(State::Active) < position(State::Disabled));
        }
    }
}
