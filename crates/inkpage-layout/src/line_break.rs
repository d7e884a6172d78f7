//! Line breaking over measured words.
//!
//! Both breakers return the index of the first word of each following line;
//! the last entry is always the word count. They may split words in place
//! through the hyphenation bridge, so indices are only valid for the word
//! sequence as it stands after the call.

use std::collections::VecDeque;

use crate::hyphenate::{hyphenate_word_at_index, BreakContext};
use crate::word::Word;

const MAX_COST: i32 = i32::MAX;

fn spacing_before(words: &VecDeque<Word>, index: usize, line_start: usize, space: i32) -> i32 {
    if index == line_start || words[index].no_space_before {
        0
    } else {
        space
    }
}

/// Break lines minimizing the sum of squared trailing space over all lines
/// but the last.
///
/// Words wider than the page are split with fallback break points first.
/// A word that still cannot fit gets a line of its own.
pub fn compute_optimal_breaks(words: &mut VecDeque<Word>, ctx: &BreakContext<'_>) -> Vec<usize> {
    if words.is_empty() {
        return Vec::new();
    }

    let mut i = 0;
    while i < words.len() {
        while words[i].width as i32 > ctx.page_width {
            if !hyphenate_word_at_index(words, i, ctx.page_width, ctx, true) {
                break;
            }
        }
        i += 1;
    }

    let n = words.len();
    let mut dp = vec![0i32; n];
    let mut choice = vec![0usize; n];
    dp[n - 1] = 0;
    choice[n - 1] = n - 1;

    for i in (0..n - 1).rev() {
        let mut line_width = 0i32;
        dp[i] = MAX_COST;

        for j in i..n {
            line_width += words[j].width as i32 + spacing_before(words, j, i, ctx.space_width);
            if line_width > ctx.page_width {
                break;
            }

            let cost = if j == n - 1 {
                0
            } else {
                let remaining = (ctx.page_width - line_width) as i64;
                let total = remaining * remaining + dp[j + 1] as i64;
                total.min(MAX_COST as i64) as i32
            };

            if cost < dp[i] {
                dp[i] = cost;
                choice[i] = j;
            }
        }

        if dp[i] == MAX_COST {
            choice[i] = i;
            dp[i] = dp[i + 1];
        }
    }

    let mut breaks = Vec::new();
    let mut current = 0;
    while current < n {
        let mut next = choice[current] + 1;
        if next <= current {
            next = current + 1;
        }
        breaks.push(next);
        current = next;
    }
    breaks
}

/// Fill each line as far as it goes, hyphenating the word that overflows.
///
/// Fallback break points are only used for a word that starts its line;
/// anywhere else the word moves to the next line instead.
pub fn compute_greedy_breaks(words: &mut VecDeque<Word>, ctx: &BreakContext<'_>) -> Vec<usize> {
    let mut breaks = Vec::new();
    let mut current = 0;

    while current < words.len() {
        let line_start = current;
        let mut line_width = 0i32;

        while current < words.len() {
            let first_on_line = current == line_start;
            let spacing = spacing_before(words, current, line_start, ctx.space_width);
            let candidate = spacing + words[current].width as i32;

            if line_width + candidate <= ctx.page_width {
                line_width += candidate;
                current += 1;
                continue;
            }

            let available = ctx.page_width - line_width - spacing;
            if available > 0
                && hyphenate_word_at_index(words, current, available, ctx, first_on_line)
            {
                current += 1;
                break;
            }

            if first_on_line {
                current += 1;
            }
            break;
        }

        breaks.push(current);
    }
    breaks
}
