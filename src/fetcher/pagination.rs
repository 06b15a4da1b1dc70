//! Pagination driver shared by every provider
//!
//! Three strategies:
//! - Paged: metadata-driven page numbers, page count read from page 1
//! - Probe: candidate URLs tried in order until one yields a body
//! - Each: a fixed list of URLs, each requested once
//!
//! Failures never propagate. A failed request or undecodable page ends that
//! plan's contribution (Paged, Probe) or skips one URL (Each), and rows
//! already decoded are kept.

use tracing::{debug, warn};

use crate::fetcher::client::CachedFetcher;
use crate::fetcher::{PageMeta, ProviderPipeline, RequestPlan, RequestStrategy};
use crate::metrics;

/// Maximum number of pages requested for one plan to prevent runaway loops
const MAX_PAGES: u32 = 10_000;

/// Run every plan of `pipeline` in order and collect the decoded rows
pub async fn run_pipeline<P: ProviderPipeline>(fetcher: &CachedFetcher, pipeline: &P) -> Vec<P::Row> {
    let mut rows = Vec::new();

    for plan in pipeline.plans() {
        let before = rows.len();

        match &plan.strategy {
            RequestStrategy::Paged { prefix, suffix } => {
                paginate_pages(fetcher, pipeline, &plan, prefix, suffix, &mut rows).await
            }
            RequestStrategy::Probe { candidates } => {
                probe_candidates(fetcher, pipeline, &plan, candidates, &mut rows).await
            }
            RequestStrategy::Each { urls } => {
                fetch_each(fetcher, pipeline, &plan, urls, &mut rows).await
            }
        }

        let added = rows.len() - before;
        metrics::record_rows_decoded(plan.provider, added);
        debug!(
            provider = %plan.provider,
            scope = %plan.scope,
            rows = added,
            "Plan complete"
        );
    }

    debug!(rows = rows.len(), "Pipeline complete");
    rows
}

/// Request `prefix + n + suffix` for n = 1..=total_pages
///
/// The page count defaults to 1 and is only taken from page 1's metadata.
async fn paginate_pages<P: ProviderPipeline>(
    fetcher: &CachedFetcher,
    pipeline: &P,
    plan: &RequestPlan,
    prefix: &str,
    suffix: &str,
    rows: &mut Vec<P::Row>,
) {
    let mut page: u32 = 1;
    let mut total_pages: u32 = 1;

    while page <= total_pages {
        if page > MAX_PAGES {
            warn!(
                provider = %plan.provider,
                scope = %plan.scope,
                "Max pages ({MAX_PAGES}) exceeded, stopping"
            );
            break;
        }

        let url = format!("{prefix}{page}{suffix}");
        debug!(
            "Fetching {} page {}/{} for {}",
            plan.provider, page, total_pages, plan.scope
        );

        let meta = match fetch_and_decode(fetcher, pipeline, plan, &url, rows).await {
            Some(meta) => meta,
            None => break,
        };

        if page == 1 {
            if let Some(declared) = meta.total_pages {
                total_pages = declared.max(1);
            }
        }
        page += 1;
    }
}

/// Try candidates in order; decode the first non-empty successful body
async fn probe_candidates<P: ProviderPipeline>(
    fetcher: &CachedFetcher,
    pipeline: &P,
    plan: &RequestPlan,
    candidates: &[String],
    rows: &mut Vec<P::Row>,
) {
    for (i, url) in candidates.iter().enumerate() {
        debug!(
            "Probing {} candidate {}/{} for {}",
            plan.provider,
            i + 1,
            candidates.len(),
            plan.scope
        );

        match fetcher.fetch(plan.provider, url).await {
            Ok(body) if !body.is_empty() => {
                if let Err(e) = pipeline.decode_page(&body, plan, rows) {
                    warn!(provider = %plan.provider, url = %url, "Decode failed: {}", e);
                }
                return;
            }
            Ok(_) => debug!("Empty body from {}", url),
            Err(e) => debug!("Candidate {} failed: {}", url, e),
        }
    }

    warn!(
        provider = %plan.provider,
        scope = %plan.scope,
        "No candidate key pattern returned data"
    );
}

/// Request every URL once
async fn fetch_each<P: ProviderPipeline>(
    fetcher: &CachedFetcher,
    pipeline: &P,
    plan: &RequestPlan,
    urls: &[String],
    rows: &mut Vec<P::Row>,
) {
    for url in urls {
        let _ = fetch_and_decode(fetcher, pipeline, plan, url, rows).await;
    }
}

async fn fetch_and_decode<P: ProviderPipeline>(
    fetcher: &CachedFetcher,
    pipeline: &P,
    plan: &RequestPlan,
    url: &str,
    rows: &mut Vec<P::Row>,
) -> Option<PageMeta> {
    let body = match fetcher.fetch(plan.provider, url).await {
        Ok(body) => body,
        Err(e) => {
            warn!(provider = %plan.provider, url = %url, "Request failed: {}", e);
            return None;
        }
    };

    match pipeline.decode_page(&body, plan, rows) {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!(provider = %plan.provider, url = %url, "Decode failed: {}", e);
            None
        }
    }
}
