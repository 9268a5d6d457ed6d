use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::TaxRateRepository;
use crate::domain::tax::TaxRate;
use crate::schema::tax_rates;

use super::models::TaxRateRow;

pub struct DieselTaxRateRepository {
    pool: DbPool,
}

impl DieselTaxRateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TaxRateRepository for DieselTaxRateRepository {
    fn all(&self) -> Result<Vec<TaxRate>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = tax_rates::table
            .select(TaxRateRow::as_select())
            .order(tax_rates::name.asc())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|r| TaxRate {
                id: r.id,
                name: r.name,
                amount: r.amount,
                included_in_price: r.included_in_price,
            })
            .collect())
    }
}
