use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::dsl::sum;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus, PaymentStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, orders};

use super::models::{OrderChangeset, OrderLineRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_lines(conn: &mut PgConnection, order: &OrderRow) -> Result<Vec<OrderLineRow>, DomainError> {
    Ok(OrderLineRow::belonging_to(order)
        .select(OrderLineRow::as_select())
        .order(order_lines::position.asc())
        .load(conn)?)
}

impl OrderRepository for DieselOrderRepository {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let row = OrderRow::from_domain(order)?;
        let lines = OrderLineRow::from_domain(order)?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(orders::table)
                .values(&row)
                .execute(conn)?;
            diesel::insert_into(order_lines::table)
                .values(&lines)
                .execute(conn)?;
            Ok(())
        })
    }

    fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::update(orders::table.find(order.id))
            .set(&OrderChangeset::from_domain(order)?)
            .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = load_lines(&mut conn, &order)?;
        order.into_domain(lines).map(Some)
    }

    fn list(&self, user_id: Option<Uuid>, limit: Option<i64>) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table
            .select(OrderRow::as_select())
            .order(orders::created_at.desc())
            .into_boxed();
        if let Some(user_id) = user_id {
            query = query.filter(orders::user_id.eq(user_id));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let rows: Vec<OrderRow> = query.load(&mut conn)?;

        let lines = OrderLineRow::belonging_to(&rows)
            .select(OrderLineRow::as_select())
            .order(order_lines::position.asc())
            .load(&mut conn)?;

        lines
            .grouped_by(&rows)
            .into_iter()
            .zip(rows)
            .map(|(lines, order)| order.into_domain(lines))
            .collect()
    }

    fn cancel(&self, id: Uuid, user_id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;
        let cancellable: Vec<&str> = OrderStatus::CANCELLABLE.iter().map(|s| s.as_str()).collect();

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(
                orders::table
                    .filter(orders::id.eq(id))
                    .filter(orders::user_id.eq(user_id))
                    .filter(orders::status.eq_any(cancellable)),
            )
            .set((
                orders::status.eq(OrderStatus::Cancelled.as_str()),
                orders::payment_status.eq(PaymentStatus::Refunded.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning(OrderRow::as_returning())
            .get_result(conn)
            .optional()?;

            let Some(order) = updated else {
                return Ok(None);
            };
            let lines = load_lines(conn, &order)?;
            order.into_domain(lines).map(Some)
        })
    }

    fn count(&self, status: Option<OrderStatus>) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        let mut query = orders::table.count().into_boxed();
        if let Some(status) = status {
            query = query.filter(orders::status.eq(status.as_str()));
        }
        Ok(query.get_result(&mut conn)?)
    }

    fn revenue(&self, status: OrderStatus) -> Result<BigDecimal, DomainError> {
        let mut conn = self.pool.get()?;
        let total: Option<BigDecimal> = orders::table
            .filter(orders::status.eq(status.as_str()))
            .select(sum(orders::total_price))
            .first(&mut conn)?;
        Ok(total.unwrap_or_else(|| BigDecimal::from(0)))
    }
}
