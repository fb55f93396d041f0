use crate::db::KvStore;
use crate::error::AppError;
use crate::models::{ZakatField, ZakatForm};

const ZAKAT_KEY: &str = "zakat";

pub struct ZakatStore<'a> {
    kv: &'a dyn KvStore,
    form: ZakatForm,
}

impl<'a> ZakatStore<'a> {
    pub fn load(kv: &'a dyn KvStore) -> Self {
        let form = match kv.get(ZAKAT_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Could not read zakat form, starting blank: {}", e);
                ZakatForm::default()
            }),
            Ok(None) => ZakatForm::default(),
            Err(e) => {
                log::warn!("Could not load zakat form: {:#}", e);
                ZakatForm::default()
            }
        };
        Self { kv, form }
    }

    pub fn form(&self) -> &ZakatForm {
        &self.form
    }

    /// `None` blanks the field. Negative or non-finite values are rejected.
    pub fn set(&mut self, field: ZakatField, value: Option<f64>) -> Result<(), AppError> {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(AppError::invalid_amount(v));
            }
        }
        self.form.set(field, value);
        self.persist();
        Ok(())
    }

    /// Compute and store the amount due.
    pub fn calculate(&mut self, rate: f64) -> Result<f64, AppError> {
        let due = self.form.assess(rate)?;
        self.form.result = Some(due);
        self.persist();
        Ok(due)
    }

    pub fn clear(&mut self) {
        self.form = ZakatForm::default();
        if let Err(e) = self.kv.remove(ZAKAT_KEY) {
            log::warn!("Failed to clear zakat form: {:#}", e);
        }
    }

    fn persist(&self) {
        let res = serde_json::to_string(&self.form)
            .map_err(anyhow::Error::from)
            .and_then(|raw| self.kv.set(ZAKAT_KEY, &raw));
        if let Err(e) = res {
            log::warn!("Failed to save zakat form: {:#}", e);
        }
    }
}
