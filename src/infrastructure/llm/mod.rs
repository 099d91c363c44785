mod completer_factory;
mod disabled_completer;
mod llm_field_completer;
mod openai_client;

pub use completer_factory::build_field_completer;
pub use disabled_completer::DisabledCompleter;
pub use llm_field_completer::{
    LlmFieldCompleter, parse_bulk_values, parse_json_object, parse_single_value,
};
pub use openai_client::OpenAiClient;
