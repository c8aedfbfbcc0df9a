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

//! Plain-text rendering of an assessment

use pythoness_core::{CategoryResult, ScoredItem, UserResult};
use std::io::{self, Write};

/// Items of a category, best first (ties broken by name)
fn ranked(category: &CategoryResult) -> Vec<(&String, &ScoredItem)> {
    let mut items: Vec<_> = category.items.iter().collect();
    items.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then_with(|| a.0.cmp(b.0)));
    items
}

pub fn render_text<W: Write>(result: &UserResult, language: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}: {:.4} ({})", result.login, result.score, language)?;
    for (category, detail) in &result.categories {
        let agg = &detail.aggregate;
        writeln!(
            out,
            "  {:<10} {:.4}  (by repository {:.4}, by volume {:.4}, {} items)",
            category.as_str(),
            agg.score(),
            agg.mean_a(),
            agg.mean_b(),
            detail.items.len()
        )?;
        for (name, item) in ranked(detail) {
            writeln!(out, "    {:<40} {:.4}", name, item.score)?;
        }
    }
    Ok(())
}
