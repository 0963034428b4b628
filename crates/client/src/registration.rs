// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Team registration.

use std::sync::Arc;

use trivia_core::RegistrationResponse;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::logging::Logger;
use crate::request::{
    DataRequestClient, HttpDataSource, HttpRequest, RequestContext, RetryError, SessionMode,
};

/// Log category and request source id for registration.
pub const SOURCE_ID: &str = "Registration";

/// Trims a team name, rejecting blank ones.
pub fn validate_team_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidTeamName(name.to_string()));
    }
    Ok(trimmed)
}

pub struct Registration {
    config: ClientConfig,
    source: HttpDataSource<RegistrationResponse>,
    logger: Logger,
}

impl Registration {
    pub fn new(
        config: ClientConfig,
        context: &RequestContext,
        client: Arc<dyn DataRequestClient>,
    ) -> Self {
        Registration {
            config,
            source: HttpDataSource::new(SOURCE_ID, context, client),
            logger: Logger::new(SOURCE_ID, Arc::clone(&context.sink)),
        }
    }

    /// Registers `team_name` with the server.
    ///
    /// Returns `false` if the request was cancelled before it completed.
    pub async fn submit(&self, team_name: &str) -> Result<bool> {
        let team = validate_team_name(team_name)?;
        let url = self.config.registration_url(team)?;
        let mode: SessionMode = self.config.session_mode;

        match self.source.request(HttpRequest::post(url), mode).await {
            Ok(_) => {
                self.logger.info(format!("registered team '{}'", team));
                Ok(true)
            }
            Err(RetryError::Cancelled) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
