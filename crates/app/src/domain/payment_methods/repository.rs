//! Payment Methods Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    payment_methods::records::{PaymentMethodKind, PaymentMethodRecord, PaymentMethodUuid},
    users::records::UserUuid,
};

const FIND_OWNED_PAYMENT_METHOD_SQL: &str = include_str!("sql/find_owned_payment_method.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentMethodsRepository;

impl PgPaymentMethodsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_owned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_method: PaymentMethodUuid,
        owner: UserUuid,
    ) -> Result<Option<PaymentMethodRecord>, sqlx::Error> {
        query_as::<Postgres, PaymentMethodRecord>(FIND_OWNED_PAYMENT_METHOD_SQL)
            .bind(payment_method.into_uuid())
            .bind(owner.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentMethodRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let kind = kind
            .parse::<PaymentMethodKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: PaymentMethodUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            kind,
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
