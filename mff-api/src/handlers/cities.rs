use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use shared_types::CitySuggestionsResponse;

use super::CitiesAppState;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    #[serde(default)]
    pub q: String,
}

/// Autocomplete never fails towards the form; errors become an empty list
pub async fn suggest_cities(
    state: web::Data<CitiesAppState>,
    query: web::Query<CityQuery>,
) -> ActixResult<HttpResponse> {
    let suggestions = match state.search.suggest(&query.q).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::warn!("City lookup failed for {:?}: {}", query.q, e);
            Vec::new()
        }
    };

    Ok(HttpResponse::Ok().json(CitySuggestionsResponse { suggestions }))
}
