use sqlx::{postgres::PgRow, PgConnection, PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::wallet::models::{HistoryFilter, Transaction, TransactionCreate};

pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 거래 레코드 생성
    /// Create transaction record
    ///
    /// reference 중복 시 unique 제약 (transactions_reference_key) 에러 발생
    pub async fn create(&self, create: &TransactionCreate) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (
                wallet_id, type, amount, status, reference, recipient_wallet_number,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, wallet_id, type, amount, status, reference, recipient_wallet_number,
                      created_at, updated_at
            "#,
        )
        .bind(create.wallet_id as i64)
        .bind(&create.transaction_type)
        .bind(create.amount as i64)
        .bind(&create.status)
        .bind(&create.reference)
        .bind(&create.recipient_wallet_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create transaction")?;

        Ok(row_to_transaction(&row))
    }

    /// reference로 거래 조회
    /// Get transaction by reference
    pub async fn get_by_reference(&self, reference: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, wallet_id, type, amount, status, reference, recipient_wallet_number,
                   created_at, updated_at
            FROM transactions
            WHERE reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction by reference")?;

        Ok(row.map(|r| row_to_transaction(&r)))
    }

    /// 지갑의 거래 내역 조회 (필터 + 페이지네이션)
    /// Get wallet transactions with filters and pagination
    ///
    /// 기준 집합: 해당 지갑이 소유한 행 + recipient_wallet_number가 해당 지갑인 행
    /// 정렬: created_at 내림차순, 동률이면 id 내림차순 (페이지 안정성 보장)
    pub async fn find_for_wallet(
        &self,
        wallet_id: u64,
        wallet_number: &str,
        filter: &HistoryFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            r#"
            SELECT id, wallet_id, type, amount, status, reference, recipient_wallet_number,
                   created_at, updated_at
            FROM transactions
            WHERE (wallet_id = $1 OR recipient_wallet_number = $2)
            "#,
        );
        let mut param = 3;
        push_filter_conditions(&mut sql, filter, &mut param);
        sql.push_str(&format!(
            " ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            param,
            param + 1
        ));

        let mut query = sqlx::query(&sql)
            .bind(wallet_id as i64)
            .bind(wallet_number);
        if let Some(transaction_type) = &filter.transaction_type {
            query = query.bind(transaction_type);
        }
        if let Some(status) = &filter.status {
            query = query.bind(status);
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch wallet transactions")?;

        Ok(rows.iter().map(row_to_transaction).collect())
    }

    /// 지갑의 거래 건수 조회 (find_for_wallet와 같은 필터 기준)
    /// Count wallet transactions with the same filters
    ///
    /// 페이지네이션 메타데이터는 필터 적용 후 건수를 기준으로 계산해야
    /// 반환 페이지와 수치가 일치한다.
    pub async fn count_for_wallet(
        &self,
        wallet_id: u64,
        wallet_number: &str,
        filter: &HistoryFilter,
    ) -> Result<u64> {
        let mut sql = String::from(
            r#"
            SELECT COUNT(*) AS total
            FROM transactions
            WHERE (wallet_id = $1 OR recipient_wallet_number = $2)
            "#,
        );
        let mut param = 3;
        push_filter_conditions(&mut sql, filter, &mut param);

        let mut query = sqlx::query(&sql)
            .bind(wallet_id as i64)
            .bind(wallet_number);
        if let Some(transaction_type) = &filter.transaction_type {
            query = query.bind(transaction_type);
        }
        if let Some(status) = &filter.status {
            query = query.bind(status);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .context("Failed to count wallet transactions")?;

        Ok(row.get::<i64, _>("total") as u64)
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 트랜잭션 내부 전용 (in-transaction primitives)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// reference로 거래 행 잠금 (SELECT ... FOR UPDATE)
    /// Lock transaction row by reference
    ///
    /// 웹훅 정산 시 상태 확인과 전이를 하나의 트랜잭션에서 직렬화한다.
    /// 같은 reference의 웹훅이 동시에 두 번 와도 한쪽만 pending을 관찰한다.
    pub async fn lock_by_reference(
        conn: &mut PgConnection,
        reference: &str,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, wallet_id, type, amount, status, reference, recipient_wallet_number,
                   created_at, updated_at
            FROM transactions
            WHERE reference = $1
            FOR UPDATE
            "#,
        )
        .bind(reference)
        .fetch_optional(conn)
        .await
        .context("Failed to lock transaction row")?;

        Ok(row.map(|r| row_to_transaction(&r)))
    }

    /// 거래 상태 전이 (compare-and-set)
    /// Transition transaction status
    ///
    /// pending -> {success, failed}만 허용. pending이 아닌 행에 대해서는
    /// 아무것도 바꾸지 않고 false를 반환한다 (멱등성 판단은 호출자 몫).
    pub async fn transition_status(
        conn: &mut PgConnection,
        transaction_id: u64,
        new_status: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, updated_at = $2
            WHERE id = $3 AND status = 'pending'
            "#,
        )
        .bind(new_status)
        .bind(Utc::now())
        .bind(transaction_id as i64)
        .execute(conn)
        .await
        .context("Failed to transition transaction status")?;

        Ok(result.rows_affected() == 1)
    }

    /// 거래 레코드 생성 (트랜잭션 내부)
    /// Create transaction record inside an open transaction
    ///
    /// 이체에서 사용: 잔액 변경과 원장 기록이 같이 커밋되거나 같이 롤백된다.
    pub async fn create_in_tx(
        conn: &mut PgConnection,
        create: &TransactionCreate,
    ) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions (
                wallet_id, type, amount, status, reference, recipient_wallet_number,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, wallet_id, type, amount, status, reference, recipient_wallet_number,
                      created_at, updated_at
            "#,
        )
        .bind(create.wallet_id as i64)
        .bind(&create.transaction_type)
        .bind(create.amount as i64)
        .bind(&create.status)
        .bind(&create.reference)
        .bind(&create.recipient_wallet_number)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
        .context("Failed to create transaction")?;

        Ok(row_to_transaction(&row))
    }
}

/// 필터 조건을 WHERE 절에 추가 (bind 순서: type -> status)
/// direction은 저장된 컬럼 조합으로 표현되므로 추가 bind 없이 $1/$2를 재사용한다.
fn push_filter_conditions(sql: &mut String, filter: &HistoryFilter, param: &mut usize) {
    if filter.transaction_type.is_some() {
        sql.push_str(&format!(" AND type = ${}", param));
        *param += 1;
    }
    if filter.status.is_some() {
        sql.push_str(&format!(" AND status = ${}", param));
        *param += 1;
    }
    match filter.direction.as_deref() {
        Some("deposit") => sql.push_str(" AND type = 'deposit'"),
        Some("sent") => sql.push_str(" AND type = 'transfer' AND wallet_id = $1"),
        Some("received") => {
            sql.push_str(" AND type = 'transfer' AND recipient_wallet_number = $2")
        }
        // 알 수 없는 방향값은 아무 행도 매칭하지 않음
        Some(_) => sql.push_str(" AND FALSE"),
        None => {}
    }
}

/// DB row를 Transaction 모델로 변환
fn row_to_transaction(row: &PgRow) -> Transaction {
    Transaction {
        id: row.get::<i64, _>("id") as u64,
        wallet_id: row.get::<i64, _>("wallet_id") as u64,
        transaction_type: row.get("type"),
        amount: row.get::<i64, _>("amount") as u64,
        status: row.get("status"),
        reference: row.get("reference"),
        recipient_wallet_number: row.get("recipient_wallet_number"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_conditions_type_and_status() {
        let filter = HistoryFilter {
            transaction_type: Some("transfer".to_string()),
            status: Some("success".to_string()),
            direction: None,
        };
        let mut sql = String::new();
        let mut param = 3;
        push_filter_conditions(&mut sql, &filter, &mut param);
        assert_eq!(sql, " AND type = $3 AND status = $4");
        assert_eq!(param, 5);
    }

    #[test]
    fn test_filter_conditions_direction_reuses_base_params() {
        let filter = HistoryFilter {
            transaction_type: None,
            status: None,
            direction: Some("received".to_string()),
        };
        let mut sql = String::new();
        let mut param = 3;
        push_filter_conditions(&mut sql, &filter, &mut param);
        assert_eq!(
            sql,
            " AND type = 'transfer' AND recipient_wallet_number = $2"
        );
        // direction은 bind를 추가하지 않음
        assert_eq!(param, 3);
    }

    #[test]
    fn test_filter_conditions_unknown_direction_matches_nothing() {
        let filter = HistoryFilter {
            transaction_type: None,
            status: None,
            direction: Some("sideways".to_string()),
        };
        let mut sql = String::new();
        let mut param = 3;
        push_filter_conditions(&mut sql, &filter, &mut param);
        assert_eq!(sql, " AND FALSE");
    }
}
