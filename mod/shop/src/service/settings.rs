use crustops_core::ServiceError;
use crustops_sql::Value;

use crate::model::Settings;

use super::ShopService;

impl ShopService {
    /// The storefront settings singleton, created with defaults on
    /// first read.
    pub fn settings(&self) -> Result<Settings, ServiceError> {
        match self.get_record::<Settings>("settings", "1") {
            Ok(s) => Ok(s),
            Err(ServiceError::NotFound(_)) => {
                let defaults = Settings::default();
                self.insert_record("settings", "1", &defaults, &[
                    ("create_at", Value::Text(Self::now())),
                ])?;
                Ok(defaults)
            }
            Err(e) => Err(e),
        }
    }

    pub fn update_settings(&self, patch: serde_json::Value) -> Result<Settings, ServiceError> {
        let current = self.settings()?;
        let updated: Settings = Self::apply_patch(&current, patch)?;
        self.update_record("settings", "1", &updated, &[])?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testing::test_service;

    #[test]
    fn settings_created_with_defaults() {
        let (svc, _) = test_service();
        let s = svc.settings().unwrap();
        assert_eq!(s.max_pies_per_day, 15);
        assert_eq!(s.service_days, vec![4, 5, 6]);
    }

    #[test]
    fn update_is_a_merge() {
        let (svc, _) = test_service();
        svc.update_settings(serde_json::json!({"maxPiesPerDay": 20}))
            .unwrap();
        let s = svc.settings().unwrap();
        assert_eq!(s.max_pies_per_day, 20);
        // Untouched fields keep their values.
        assert_eq!(s.service_start_hour, 16);
    }
}
