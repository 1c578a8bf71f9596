use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::table::visible_len;
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "customer_new" | "marketing_add" | "employee_add" => Colour::Green,
        "del" | "clear" | "marketing_del" | "employee_remove" => Colour::Red,
        "discount" | "followup_dismiss" | "followup_interval" => Colour::Yellow,
        "salary_paid" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        "import" => Colour::RGB(255, 153, 51),
        "import_rejected" => Colour::RGB(200, 0, 0),
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

struct LogEntry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        let rendered: Vec<String> = entries.iter().map(render_op).collect();
        let op_w = rendered
            .iter()
            .map(|s| visible_len(s))
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);

        println!("📜 Internal log:\n");

        for (e, op) in entries.iter().zip(rendered) {
            let padding = " ".repeat(op_w.saturating_sub(visible_len(&op)));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                op,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

/// `operation (target)`, truncated to the column width with only the
/// operation word coloured.
fn render_op(e: &LogEntry) -> String {
    let plain = if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    };

    let visible = if plain.chars().count() > OP_WIDTH_MAX {
        let mut s: String = plain.chars().take(OP_WIDTH_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&e.operation);
    match visible.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}
