//! Status tool
//!
//! Runtime status of the nutrilabel service and the workflow guide for assistants.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Recipe-to-label workflow for AI assistants
pub const RECIPE_INSTRUCTIONS: &str = r#"
# Nutrilabel Recipe Instructions

This guide explains how to turn pasted recipe text into a nutrition label.

## Overview

1. **Parse** the recipe text into ingredient lines and sub-recipes
2. **Specify** ambiguous ingredients (e.g. which kind of tomato)
3. **Match** every ingredient to a food database record
4. **Calculate** the nutrition report (per 100 g, per serving, label)

---

## Step 1: Parse

**Tool:** `parse_recipe`
- Pass the raw text exactly as pasted. HTML, bullets, emoji and Unicode fractions are cleaned up.
- The first line that is not a header, URL or servings line becomes the dish name.
- Directions, notes, URLs and source credits are skipped.
- `errors` lists lines that could not be used. Report them to the user.

**Sub-recipes:** a line like `1 cup salsa (2 tomato, 1 onion, 1 tbsp cilantro)` becomes a
sub-recipe. Every item inside the parentheses needs its own quantity; otherwise the whole
sub-recipe is rejected and reported in `errors`.

---

## Step 2: Specify

If `pending_specifications` is not empty, ask the user each `prompt`
(e.g. "What kind of tomato? (cherry, grape, roma, ...)").

**Tool:** `resolve_specifications`
- Pass the `recipe` from step 1 and one choice per pending location.
- A choice of `null` means "don't know" and uses a medium-sized default.

---

## Step 3: Match

**Tool:** `search_foods` (requires `NUTRILABEL_FDC_API_KEY`)
- Pass the ingredient name. Candidates are ranked automatically; `best` is the pick.
- Show the user the top few candidates when the best one looks wrong.

**Tool:** `rank_food_candidates`
- Ranks candidates you already have, without calling the database.

---

## Step 4: Calculate

**Tool:** `calculate_nutrition`
- `recipe`: the (specified) recipe from steps 1-2
- `assignments`: one entry per ingredient location with the chosen `food`, or `skip: true`
- `serving_size_g`: grams per serving (required)
- `final_weight_g`: cooked weight if the user weighed the finished dish
- `custom_conversions`: grams per unit for ingredients the database cannot convert
- `use_fallback_estimates`: guess weights for unknown units instead of failing

Review `warnings` in the report: estimated weights and implausible values are listed there.

**Tool:** `format_nutrition_label` renders a per-serving profile as label rows and text.

---

## Notes

- Yield: cooked weight / raw weight must be above 0 and at most 2
- Skipped ingredients add neither nutrients nor weight
- Label values follow FDA rounding rules; % Daily Value uses the 2020 reference values
"#;

/// Runtime status of the nutrilabel service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilabelStatus {
    /// Build information; `build` is the same one-line summary the banner prints
    pub build: String,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Food database
    pub food_database_configured: bool,
    pub food_database_url: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    food_database_configured: bool,
    food_database_url: String,
}

impl StatusTracker {
    pub fn new(food_database_configured: bool, food_database_url: &str) -> Self {
        Self {
            start_time: Instant::now(),
            food_database_configured,
            food_database_url: food_database_url.to_string(),
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> NutrilabelStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilabelStatus {
            build: build_info.summary(),
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            food_database_configured: self.food_database_configured,
            food_database_url: self.food_database_url.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
