//! Partner notification by mail

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{CollaboratorError, Notifier};
use crate::config::MailConfig;
use crate::orders::NewOrder;

/// Subject and plain-text body of the partner summary
pub fn compose_summary(cafe_name: &str, order_id: i64, order: &NewOrder) -> (String, String) {
    let subject = format!("New Order #{} - {}", order_id, cafe_name);

    let mut body = format!(
        "Order #{}\nCustomer: {}\nTable: {}\nTakeaway: {}\nTotal: {}\n\nItems:\n",
        order_id,
        order.customer_name(),
        order.table_number.as_deref().unwrap_or("-"),
        if order.takeaway { "yes" } else { "no" },
        order.total,
    );
    for item in &order.items {
        body.push_str(&format!(
            "- {} x {} ({}) = {}\n",
            item.qty, item.name, item.size, item.price
        ));
    }

    (subject, body)
}

/// Sends the summary over SMTP (STARTTLS) to every configured recipient
pub struct MailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
    cafe_name: String,
}

impl MailNotifier {
    /// Validates addresses up front; does not connect.
    pub fn new(config: &MailConfig) -> Result<Self, CollaboratorError> {
        let from: Mailbox = config.sender.parse()?;
        let to = config
            .recipients
            .iter()
            .map(|r| r.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;
        if to.is_empty() {
            return Err(CollaboratorError::NoRecipients);
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            to,
            cafe_name: config.cafe_name.clone(),
        })
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    fn name(&self) -> &'static str {
        "mail"
    }

    async fn notify(&self, order_id: i64, order: &NewOrder) -> Result<(), CollaboratorError> {
        let (subject, body) = compose_summary(&self.cafe_name, order_id, order);

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for to in &self.to {
            builder = builder.to(to.clone());
        }
        let message = builder.body(body)?;

        self.transport.send(message).await?;
        tracing::info!(
            "[MAIL] Order #{} summary sent to {} recipient(s)",
            order_id,
            self.to.len()
        );
        Ok(())
    }
}

/// Writes the summary to the log instead of mailing it (mail disabled)
pub struct LogNotifier {
    cafe_name: String,
}

impl LogNotifier {
    pub fn new(cafe_name: impl Into<String>) -> Self {
        Self {
            cafe_name: cafe_name.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, order_id: i64, order: &NewOrder) -> Result<(), CollaboratorError> {
        let (subject, body) = compose_summary(&self.cafe_name, order_id, order);
        tracing::info!("[MAIL disabled] {}\n{}", subject, body);
        Ok(())
    }
}
