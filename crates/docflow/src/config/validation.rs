/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */


use crate::config::{types::*, ConfigValidationError};
use crate::database::{connection::validate_schema_name, BackendType};
use crate::logging::is_valid_level;

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigValidationError>;
}

impl Validate for DocflowConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        let mut errors: Vec<ConfigValidationError> = [
            self.database.validate(),
            self.workflow.validate(),
            self.logging.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigValidationError::Multiple { errors }),
        }
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Err(e) = BackendType::from_url(&self.url) {
            return Err(ConfigValidationError::InvalidDatabaseUrl {
                url: self.url.clone(),
                reason: e.to_string(),
            });
        }

        if self.pool_size == 0 || self.pool_size > 100 {
            return Err(ConfigValidationError::InvalidPoolSize {
                size: self.pool_size,
            });
        }

        if let Some(schema) = &self.schema {
            validate_schema_name(schema)
                .map_err(|e| ConfigValidationError::InvalidSchema(e.to_string()))?;
        }

        Ok(())
    }
}

impl Validate for WorkflowConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_page_size < 1 {
            return Err(ConfigValidationError::InvalidPageSize {
                message: format!("max_page_size {} must be positive", self.max_page_size),
            });
        }
        if self.default_page_size < 1 || self.default_page_size > self.max_page_size {
            return Err(ConfigValidationError::InvalidPageSize {
                message: format!(
                    "default_page_size {} must be between 1 and max_page_size {}",
                    self.default_page_size, self.max_page_size
                ),
            });
        }

        for (role, days) in [
            ("executor", self.executor_expiring_days),
            ("clerk", self.clerk_expiring_days),
        ] {
            if !(0..=366).contains(&days) {
                return Err(ConfigValidationError::InvalidHorizon { role, days });
            }
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if !is_valid_level(&self.level) {
            return Err(ConfigValidationError::InvalidLogLevel {
                level: self.level.clone(),
            });
        }
        Ok(())
    }
}
