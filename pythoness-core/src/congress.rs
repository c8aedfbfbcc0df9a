// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Weighted aggregation ("congress")
//!
//! Each item votes in two houses. House A weights items by their `seats_a`,
//! house B by their `seats_b`. The result is the root mean square of the two
//! weighted means, so a high mean in either house lifts the aggregate.

use crate::model::{Aggregate, ScoredItem};

/// Sum of `terms` taken in a canonical order so the result does not depend on
/// input order.
fn ordered_sum(mut terms: Vec<f64>) -> f64 {
    terms.sort_by(f64::total_cmp);
    terms.into_iter().sum()
}

/// Aggregate scored items. An empty input yields an all-zero aggregate.
pub fn congress<'a, I>(items: I) -> Aggregate
where
    I: IntoIterator<Item = &'a ScoredItem>,
{
    let items: Vec<&ScoredItem> = items.into_iter().collect();

    let votes_a = ordered_sum(items.iter().map(|i| i.score * i.seats_a).collect());
    let votes_b = ordered_sum(items.iter().map(|i| i.score * i.seats_b).collect());
    let seats_a = ordered_sum(items.iter().map(|i| i.seats_a).collect());
    let seats_b = ordered_sum(items.iter().map(|i| i.seats_b).collect());

    let mean_a = if seats_a > 0.0 { votes_a / seats_a } else { 0.0 };
    let mean_b = if seats_b > 0.0 { votes_b / seats_b } else { 0.0 };

    Aggregate::from_means(mean_a, mean_b, seats_a, seats_b)
}
