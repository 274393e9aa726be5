//! Printable HTML receipts

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{CollaboratorError, ReceiptPrinter};
use crate::config::ReceiptConfig;
use crate::orders::{NewOrder, now_minute};

/// Writes `receipt_<id>.html` into the output directory and optionally
/// hands it to an opener command (browser / print dialog).
pub struct HtmlReceiptPrinter {
    output_dir: PathBuf,
    cafe_name: String,
    open_command: Option<String>,
}

impl HtmlReceiptPrinter {
    pub fn new(config: &ReceiptConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            cafe_name: config.cafe_name.clone(),
            open_command: config.open_command.clone(),
        }
    }

    pub fn receipt_path(&self, order_id: i64) -> PathBuf {
        self.output_dir.join(format!("receipt_{}.html", order_id))
    }

    pub fn render(&self, order_id: i64, order: &NewOrder, printed_at: &str) -> String {
        let mut items = String::new();
        for item in &order.items {
            items.push_str(&format!(
                "      <li>{} x {} ({}) = {}</li>\n",
                item.qty,
                escape_html(&item.name),
                escape_html(&item.size),
                item.price
            ));
        }

        let service = match (&order.table_number, order.takeaway) {
            (_, true) => "Takeaway".to_string(),
            (Some(table), false) => format!("Table {}", escape_html(table)),
            (None, false) => "Counter".to_string(),
        };

        format!(
            r#"<html>
  <head>
    <title>Receipt #{id}</title>
    <style>
      body {{ font-family: monospace; background: #fff; color: #000; }}
      h1 {{ color: #C9A24D; }}
    </style>
  </head>
  <body>
    <h1>{cafe}</h1>
    <p>Order #{id}</p>
    <p>Customer: {customer}</p>
    <p>{service}</p>
    <p>Date: {printed_at}</p>
    <hr>
    <ul>
{items}    </ul>
    <hr>
    <p><b>Total: {total}</b></p>
    <p>Thank you for choosing {cafe}!</p>
  </body>
</html>
"#,
            id = order_id,
            cafe = escape_html(&self.cafe_name),
            customer = escape_html(order.customer_name()),
            service = service,
            printed_at = printed_at,
            items = items,
            total = order.total,
        )
    }

    fn open(&self, command: &str, path: &Path) -> Result<(), CollaboratorError> {
        // Not awaited: the opener may stay alive (browser) long after the file is shown
        let child = tokio::process::Command::new(command).arg(path).spawn()?;
        tracing::debug!(
            "[RECEIPT] Opened {} with {} (pid {:?})",
            path.display(),
            command,
            child.id()
        );
        Ok(())
    }
}

#[async_trait]
impl ReceiptPrinter for HtmlReceiptPrinter {
    fn name(&self) -> &'static str {
        "html-receipt"
    }

    async fn print(&self, order_id: i64, order: &NewOrder) -> Result<(), CollaboratorError> {
        let html = self.render(order_id, order, &now_minute());

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.receipt_path(order_id);
        tokio::fs::write(&path, html).await?;
        tracing::info!("[RECEIPT] Order #{} written to {}", order_id, path.display());

        if let Some(command) = &self.open_command {
            self.open(command, &path)?;
        }
        Ok(())
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
