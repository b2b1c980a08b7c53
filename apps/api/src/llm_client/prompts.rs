// Cross-cutting prompt fragments. Task prompts live next to the service that
// uses them (see `ai::prompts`).

/// Appended to every task whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do not add any text before or after the JSON. \
    Do not wrap the JSON in markdown code fences.";

/// Appended to tasks whose reply is a single number.
pub const NUMBER_ONLY_INSTRUCTION: &str = "\
    Respond with the number only, without any other words or symbols.";
