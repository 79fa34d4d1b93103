mod cache_freshness;
mod task_editing;
