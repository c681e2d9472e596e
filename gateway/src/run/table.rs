use std::sync::Arc;

use guardgate_core::types::guardrails::GuardConfig;
use prettytable::{row, Table};

pub fn pretty_print_guards(guards: &[&Arc<GuardConfig>]) {
    let mut table = Table::new();

    table.add_row(row![bF=>
        "Guard",
        "Type",
        "Backend Model",
        "Target",
        "Input Types",
        "Timeout",
    ]);

    for guard in guards {
        let input_types = guard
            .input_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(row![
            guard.id,
            guard.guard_type,
            guard.target_model_name,
            guard.target,
            input_types,
            format!("{}s", guard.request_timeout.as_secs_f64()),
        ]);
    }

    table.printstd();
}
