use sqlx::{postgres::PgRow, PgConnection, PgPool, Row};
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::wallet::models::Wallet;

pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 지갑 생성
    /// Create wallet (balance 0으로 시작)
    ///
    /// wallet_number 또는 user_id 충돌 시 DB의 unique 제약이 에러를 반환하며,
    /// 어떤 제약에 걸렸는지는 호출자가 에러 메시지의 제약 이름으로 구분한다.
    pub async fn create(&self, user_id: u64, wallet_number: &str) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, wallet_number, balance, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $3)
            RETURNING id, user_id, wallet_number, balance, created_at, updated_at
            "#,
        )
        .bind(user_id as i64)
        .bind(wallet_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create wallet")?;

        Ok(row_to_wallet(&row))
    }

    /// 사용자 ID로 지갑 조회
    /// Get wallet by user ID
    pub async fn get_by_user_id(&self, user_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, wallet_number, balance, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by user id")?;

        Ok(row.map(|r| row_to_wallet(&r)))
    }

    /// 지갑 ID로 조회
    /// Get wallet by ID
    pub async fn get_by_id(&self, wallet_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, wallet_number, balance, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(wallet_id as i64)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by id")?;

        Ok(row.map(|r| row_to_wallet(&r)))
    }

    /// 지갑 번호로 조회 (이체 수신자 확인용)
    /// Get wallet by wallet number
    pub async fn get_by_wallet_number(&self, wallet_number: &str) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, wallet_number, balance, created_at, updated_at
            FROM wallets
            WHERE wallet_number = $1
            "#,
        )
        .bind(wallet_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch wallet by wallet number")?;

        Ok(row.map(|r| row_to_wallet(&r)))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 트랜잭션 내부 전용 (in-transaction primitives)
    // 잔액 변경은 반드시 하나의 DB 트랜잭션 안에서 실행
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 지갑 행 잠금 (SELECT ... FOR UPDATE)
    /// Lock wallet row for update
    ///
    /// 같은 지갑에 대한 동시 잔액 변경을 직렬화한다.
    /// 데드락 방지를 위해 여러 지갑을 잠글 때는 호출자가 id 오름차순으로 잠근다.
    pub async fn lock_by_id(conn: &mut PgConnection, wallet_id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, wallet_number, balance, created_at, updated_at
            FROM wallets
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(wallet_id as i64)
        .fetch_optional(conn)
        .await
        .context("Failed to lock wallet row")?;

        Ok(row.map(|r| row_to_wallet(&r)))
    }

    /// 잔액 차감 (조건부 UPDATE)
    /// Debit wallet balance
    ///
    /// balance >= amount 조건을 UPDATE 문 안에서 검사하므로
    /// 확인과 차감이 한 문장으로 원자적으로 수행된다.
    ///
    /// # Returns
    /// * `Ok(Some(Wallet))` - 차감 후 지갑
    /// * `Ok(None)` - 잔액 부족 (차감되지 않음)
    pub async fn debit(
        conn: &mut PgConnection,
        wallet_id: u64,
        amount: u64,
    ) -> Result<Option<Wallet>> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = balance - $1, updated_at = $2
            WHERE id = $3 AND balance >= $1
            RETURNING id, user_id, wallet_number, balance, created_at, updated_at
            "#,
        )
        .bind(amount as i64)
        .bind(Utc::now())
        .bind(wallet_id as i64)
        .fetch_optional(conn)
        .await
        .context("Failed to debit wallet")?;

        Ok(row.map(|r| row_to_wallet(&r)))
    }

    /// 잔액 증가
    /// Credit wallet balance (상한 없음)
    pub async fn credit(
        conn: &mut PgConnection,
        wallet_id: u64,
        amount: u64,
    ) -> Result<Wallet> {
        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = balance + $1, updated_at = $2
            WHERE id = $3
            RETURNING id, user_id, wallet_number, balance, created_at, updated_at
            "#,
        )
        .bind(amount as i64)
        .bind(Utc::now())
        .bind(wallet_id as i64)
        .fetch_one(conn)
        .await
        .context("Failed to credit wallet")?;

        Ok(row_to_wallet(&row))
    }
}

/// DB row를 Wallet 모델로 변환
fn row_to_wallet(row: &PgRow) -> Wallet {
    Wallet {
        id: row.get::<i64, _>("id") as u64,
        user_id: row.get::<i64, _>("user_id") as u64,
        wallet_number: row.get("wallet_number"),
        balance: row.get::<i64, _>("balance") as u64,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
