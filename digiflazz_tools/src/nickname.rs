use std::{fmt::Display, str::FromStr, sync::Arc};

use log::*;
use reqwest::Client;
use serde::Deserialize;

use crate::{DigiflazzApiError, DigiflazzConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicknameGame {
    MobileLegends,
    FreeFire,
}

impl NicknameGame {
    pub fn requires_zone(&self) -> bool {
        matches!(self, NicknameGame::MobileLegends)
    }

    fn path(&self) -> &'static str {
        match self {
            NicknameGame::MobileLegends => "/ml",
            NicknameGame::FreeFire => "/ff",
        }
    }
}

impl Display for NicknameGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NicknameGame::MobileLegends => write!(f, "MOBILE LEGENDS"),
            NicknameGame::FreeFire => write!(f, "FREE FIRE"),
        }
    }
}

impl FromStr for NicknameGame {
    type Err = DigiflazzApiError;

    /// Accepts the catalog brand name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MOBILE LEGENDS" => Ok(NicknameGame::MobileLegends),
            "FREE FIRE" => Ok(NicknameGame::FreeFire),
            _ => Err(DigiflazzApiError::UnsupportedGame(s.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct NicknameReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    name: Option<String>,
}

/// Client for the public in-game nickname lookup service.
#[derive(Clone)]
pub struct NicknameApi {
    base_url: String,
    client: Arc<Client>,
}

impl NicknameApi {
    pub fn new(config: &DigiflazzConfig) -> Result<Self, DigiflazzApiError> {
        let client =
            Client::builder().timeout(config.timeout).build().map_err(|e| DigiflazzApiError::Initialization(e.to_string()))?;
        Ok(Self { base_url: config.nickname_url.clone(), client: Arc::new(client) })
    }

    /// Returns the player's nickname, or `None` if the service does not know the id.
    pub async fn lookup(
        &self,
        game: NicknameGame,
        user_id: &str,
        zone_id: Option<&str>,
    ) -> Result<Option<String>, DigiflazzApiError> {
        let mut params = vec![("id", user_id)];
        if game.requires_zone() {
            let zone = zone_id.map(str::trim).filter(|z| !z.is_empty());
            let zone = zone.ok_or_else(|| DigiflazzApiError::MissingZoneId(game.to_string()))?;
            params.push(("server", zone));
        }
        let url = format!("{}{}", self.base_url, game.path());
        debug!("🛰️ Looking up {game} nickname for {user_id}");
        let response =
            self.client.get(url).query(&params).send().await.map_err(|e| DigiflazzApiError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(DigiflazzApiError::QueryError { status, message });
        }
        let reply = response.json::<NicknameReply>().await.map_err(|e| DigiflazzApiError::JsonError(e.to_string()))?;
        if reply.success {
            Ok(reply.name)
        } else {
            debug!("🛰️ No {game} player found for {user_id}");
            Ok(None)
        }
    }
}
