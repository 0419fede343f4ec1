use bravepipe_core::{DescriptionsData, PoisData, Result, SearchApi, WebSearchData};

pub(crate) async fn web_search(
    api: &dyn SearchApi,
    query: &str,
    count: i64,
    offset: i64,
) -> Result<String> {
    let data = api.web_search(query, Some(count), Some(offset)).await?;
    Ok(format_web_results(&data))
}

/// Local search with enrichment and web-search fallback.
///
/// The initial location search is not caught: its failures propagate, and a
/// zero-id result already has its own degrade path. Only the enrichment step
/// (details + descriptions) is recovered from, so "no location ids found" and
/// "id found but enrichment failed" stay distinct in the logs while the
/// caller sees web results either way.
pub(crate) async fn local_search(api: &dyn SearchApi, query: &str, count: i64) -> Result<String> {
    let found = api.location_search(query, count).await?;
    let ids = location_ids(&found);
    if ids.is_empty() {
        tracing::debug!(query, "no location ids; degrading to web search");
        return web_search(api, query, count, 0).await;
    }
    match enrich(api, &ids).await {
        Ok((details, descriptions)) => Ok(format_pois(&details, &descriptions)),
        Err(e) => {
            tracing::warn!(error = %e, "POI enrichment failed; degrading to web search");
            web_search(api, query, count, 0).await
        }
    }
}

// Detail and description lookups run sequentially, never as a burst: both
// draw on the same per-endpoint rate-limit budget family.
async fn enrich(api: &dyn SearchApi, ids: &[String]) -> Result<(PoisData, DescriptionsData)> {
    let details = api.poi_details(ids).await?;
    let descriptions = api.poi_descriptions(ids).await?;
    Ok((details, descriptions))
}

pub(crate) async fn poi_details(api: &dyn SearchApi, ids: &[String]) -> Result<String> {
    if ids.is_empty() {
        return Ok("No POI IDs provided.".to_string());
    }
    let details = api.poi_details(ids).await?;
    Ok(format_pois(&details, &DescriptionsData::default()))
}

pub(crate) async fn poi_descriptions(api: &dyn SearchApi, ids: &[String]) -> Result<String> {
    if ids.is_empty() {
        return Ok("No POI IDs provided.".to_string());
    }
    let data = api.poi_descriptions(ids).await?;
    if data.descriptions.is_empty() {
        return Ok("No descriptions found.".to_string());
    }
    let blocks: Vec<String> = data
        .descriptions
        .iter()
        .map(|(id, text)| format!("ID: {id}\nDescription: {text}"))
        .collect();
    Ok(blocks.join("\n\n"))
}

fn location_ids(data: &WebSearchData) -> Vec<String> {
    data.locations
        .as_ref()
        .and_then(|l| l.results.as_ref())
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r.id.as_deref())
                .filter(|id| !id.trim().is_empty())
                .map(|id| id.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn format_web_results(data: &WebSearchData) -> String {
    let results = data
        .web
        .as_ref()
        .and_then(|w| w.results.as_deref())
        .unwrap_or(&[]);
    if results.is_empty() {
        return "No results found.".to_string();
    }
    let blocks: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "Title: {}\nDescription: {}\nURL: {}",
                r.title, r.description, r.url
            )
        })
        .collect();
    blocks.join("\n\n")
}

fn format_pois(data: &PoisData, descriptions: &DescriptionsData) -> String {
    if data.results.is_empty() {
        return "No local results found".to_string();
    }
    let blocks: Vec<String> = data
        .results
        .iter()
        .map(|poi| {
            let address: Vec<&str> = [
                poi.address.street_address.as_deref(),
                poi.address.locality.as_deref(),
                poi.address.region.as_deref(),
                poi.address.postal_code.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
            let address = if address.is_empty() {
                "N/A".to_string()
            } else {
                address.join(", ")
            };
            let rating_value = poi
                .rating
                .as_ref()
                .and_then(|r| r.value)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let rating_count = poi.rating.as_ref().and_then(|r| r.count).unwrap_or(0);
            let hours = if poi.opening_hours.is_empty() {
                "N/A".to_string()
            } else {
                poi.opening_hours.join(", ")
            };
            let description = descriptions
                .descriptions
                .get(&poi.id)
                .map(|s| s.as_str())
                .unwrap_or("No description available");
            format!(
                "Name: {}\nAddress: {}\nPhone: {}\nRating: {} ({} reviews)\nPrice Range: {}\nHours: {}\nDescription: {}",
                poi.name,
                address,
                poi.phone.as_deref().unwrap_or("N/A"),
                rating_value,
                rating_count,
                poi.price_range.as_deref().unwrap_or("N/A"),
                hours,
                description,
            )
        })
        .collect();
    blocks.join("\n---\n")
}
