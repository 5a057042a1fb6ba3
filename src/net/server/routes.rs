use crate::data::arena::are_adjacent;
use crate::data::error::GameError;
use crate::data::potions::PotionColor;
use crate::net::{HttpRequest, HttpResponse};
use crate::registry::{parse_id, MatchRegistry};
use hyper::Method;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const PREFIX: &str = "/api/game";

fn route(path: &str) -> &str {
    let path = match path.strip_prefix(PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    };
    path.trim_end_matches('/')
}

pub struct Routes {
    registry: Arc<MatchRegistry>,
}

impl Routes {
    pub fn new(registry: Arc<MatchRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        debug!(method = %request.method, path = %request.path, "request");
        if request.method == Method::OPTIONS.as_str() {
            return HttpResponse::no_content();
        }
        match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                debug!(method = %request.method, path = %request.path, error = %err, "request rejected");
                HttpResponse::from(err)
            }
        }
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, GameError> {
        let registry = &self.registry;
        let player = || parse_id(request.param("playerId")?);
        let color = || PotionColor::parse(request.param("potionColor")?);
        let response = match (request.method.as_str(), route(&request.path)) {
            ("GET", "") => HttpResponse::json(&registry.snapshot()?),
            ("POST", "/new") => HttpResponse::json(&registry.new_match()),
            ("POST", "/join") => HttpResponse::json(&registry.join(request.param("playerName")?)?),
            ("POST", "/cast") => {
                HttpResponse::json(&registry.cast(player()?, request.param("w1")?, request.param("w2")?)?)
            }
            ("POST", "/create-potion") => {
                HttpResponse::json(&registry.brew(player()?, request.param("w1")?, request.param("w2")?)?)
            }
            ("POST", "/meditate") => HttpResponse::json(&registry.meditate(player()?)?),
            ("POST", "/attack") => {
                let attacker = parse_id(request.param("attackerId")?)?;
                let raw = request.param("targetId")?;
                let target = Uuid::parse_str(raw.trim())
                    .map_err(|_| GameError::validation(format!("no target with id '{}'", raw.trim())))?;
                HttpResponse::json(&registry.attack(attacker, target, request.param("spellName")?)?)
            }
            ("POST", "/activate-defense") => {
                HttpResponse::json(&registry.activate_defense(player()?, request.param("spellName")?)?)
            }
            ("POST", "/start-arena") => HttpResponse::json(&registry.start_arena()?),
            ("POST", "/end-turn") => HttpResponse::json(&registry.end_turn(player()?)?),
            ("POST", "/end-arena") => HttpResponse::json(&registry.end_arena()?),
            ("POST", "/use-potion") => HttpResponse::json(&registry.use_potion(player()?, color()?)?),
            ("POST", "/give-potion") => HttpResponse::json(&registry.give_potion(player()?, color()?)?),
            ("POST", "/reset") => {
                registry.reset();
                HttpResponse::no_content()
            }
            ("GET", "/adjacent") => {
                let adjacent = are_adjacent(
                    request.number("pos1")?,
                    request.number("pos2")?,
                    request.number("totalPlayers")?,
                );
                HttpResponse::json(&adjacent)
            }
            (method, path) => return Err(GameError::not_found(format!("no route for {} {}", method, path))),
        };
        Ok(response)
    }
}
