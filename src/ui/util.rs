use rust_decimal::Decimal;

/// Money for display: symbol, thousands separators, two decimals.
/// `(dec!(-1234.5), "€")` renders as `-€1,234.50`.
pub(crate) fn format_amount(value: Decimal, symbol: &str) -> String {
    let rounded = value.abs().round_dp(2);
    let text = format!("{rounded:.2}");
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{grouped}.{cents}")
}

/// Cut `s` to at most `max` characters, ending in `…` when shortened.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.char_indices().nth(max).is_none() {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let keep = s.char_indices().nth(max - 1).map_or(s.len(), |(i, _)| i);
    format!("{}…", &s[..keep])
}

/// `[████░░░░]` for a fill ratio in 0..=1. NaN draws empty.
pub(crate) fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

// ── List cursor ───────────────────────────────────────────────
// `index` is the selected row, `scroll` the first visible one and `page`
// the number of visible rows.

pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 >= len {
        return;
    }
    *index += 1;
    let page = page.max(1);
    if *index >= *scroll + page {
        *scroll = *index + 1 - page;
    }
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    *scroll = (*scroll).min(*index);
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    (*index, *scroll) = (0, 0);
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    let Some(last) = len.checked_sub(1) else {
        return;
    };
    *index = last;
    *scroll = len.saturating_sub(page.max(1));
}
