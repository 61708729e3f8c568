pub mod prompts;
pub mod render;

pub use prompts::{
    collect_request, prompt_age_group, prompt_disease, prompt_formula, prompt_formula_search,
    prompt_target_mode, prompt_yes_no,
};
pub use render::{
    display_balance, display_formula_list, display_guidelines, display_outputs, display_plan,
    display_targets,
};
