//! Prompt templates.
//!
//! Analysis prompts ask for JSON; documentation prompts ask for markdown.
//! Structured context is interpolated as pretty-printed JSON.

use serde::Serialize;

/// Pretty JSON for embedding in a prompt. Serialization of the crate's own
/// types cannot fail; `null` is used if it somehow does.
pub fn to_prompt_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Asks whether a file is directly executable and what it consumes/produces
pub fn entry_point(path: &str, content: &str) -> String {
    format!(
        r#"Analyze the following code file and determine if it's an entry point for a workflow or analysis:

File: {path}

```
{content}
```

Please provide a JSON response with the following structure:
{{
    "is_entry_point": true/false,
    "main_function": "<name of main function if exists>",
    "accepts_arguments": true/false,
    "description": "<brief description of what this entry point does>",
    "expected_inputs": ["<list of expected inputs>"],
    "expected_outputs": ["<list of expected outputs>"]
}}

Focus on identifying whether this file is designed to be executed directly or imported as a module.
"#
    )
}

/// Asks for a step-by-step decomposition of an accepted entry point
pub fn workflow(path: &str, description: &str, content: &str) -> String {
    format!(
        r#"Analyze the following code to identify a complete workflow. This is identified as an entry point.

Entry point file: {path}
Entry point description: {description}

```
{content}
```

Please provide a JSON response with the following structure:
{{
    "workflow_name": "<descriptive name for this workflow>",
    "steps": [
        {{
            "step_number": 1,
            "name": "<step name>",
            "description": "<what this step does>",
            "code_reference": "<function or class responsible>",
            "inputs": ["<list of inputs>"],
            "outputs": ["<list of outputs>"],
            "potential_failures": ["<common failure points>"]
        }}
    ],
    "execution_flow": "<description of how the steps connect>",
    "estimated_runtime": "<estimated runtime for different data sizes>",
    "resource_requirements": "<memory, CPU, disk space requirements>"
}}

Focus on identifying the logical steps in the workflow, potential failure points, and resource requirements.
"#
    )
}

/// Asks for scaling limits across all workflows
pub fn scaling_limitations(workflows_json: &str) -> String {
    format!(
        r#"Analyze the following workflows to identify scaling limitations:

{workflows_json}

Please provide a JSON response with the following structure:
{{
    "data_size_limitations": "<description of data size limitations>",
    "memory_limitations": "<description of memory limitations>",
    "processing_time_limitations": "<description of processing time limitations>",
    "suggested_workarounds": [
        {{
            "limitation": "<specific limitation>",
            "workaround": "<suggested workaround>",
            "implementation_difficulty": "easy/medium/hard"
        }}
    ]
}}

Focus on identifying bottlenecks and limitations when dealing with larger datasets.
"#
    )
}

/// Asks for performance bottlenecks across all workflows
pub fn bottlenecks(workflows_json: &str) -> String {
    format!(
        r#"Analyze the following workflows to identify potential bottlenecks:

{workflows_json}

Please provide a JSON response with a list of bottlenecks with the following structure:
[
    {{
        "location": "<specific step or function>",
        "description": "<description of the bottleneck>",
        "impact": "<impact on overall performance>",
        "potential_solutions": ["<list of potential solutions>"]
    }}
]

Focus on identifying performance bottlenecks that would impact large dataset processing.
"#
    )
}

/// Asks which output files the workflows produce
pub fn output_files(outputs_json: &str) -> String {
    format!(
        r#"The following workflows were found in a repository, together with the outputs each step and entry point declares:

{outputs_json}

Identify the output files these workflows write. Please provide a JSON response with the following structure:
{{
    "files": [
        {{
            "file_type": "<short type label, e.g. csv, pdf, log>",
            "name_pattern": "<file name or glob the workflow writes>",
            "description": "<what the file contains>",
            "produced_by": "<workflow or step that writes it>",
            "fields": ["<columns or fields, if structured>"]
        }}
    ]
}}

Only include files that are written to disk.
"#
    )
}

/// Main README
pub fn main_readme(summary_json: &str) -> String {
    format!(
        r#"Generate a comprehensive README.md file for the following repository:

Repository Summary: {summary_json}

The README should include the following sections:
1. Introduction and Purpose
2. Overview of Features
3. Installation Instructions
4. Quick Start Guide
5. Detailed Usage Guide
6. Workflow Overview
7. Output Files Guide
8. Scaling Considerations
9. Troubleshooting
10. Contributing Guidelines

Format the README in Markdown. Make it comprehensive, clear, and user-friendly.
Focus on helping users understand what the software does and how to use it effectively.
"#
    )
}

/// Installation guide
pub fn installation_guide(repo_name: &str, dependencies_json: &str) -> String {
    format!(
        r#"Generate a comprehensive installation guide for the following repository:

Repository Name: {repo_name}
Dependencies: {dependencies_json}

The installation guide should include the following sections:
1. System Requirements
2. Prerequisites
3. Step-by-Step Installation Instructions
4. Verification Steps
5. Common Installation Issues and Solutions

Format the guide in Markdown. Make it comprehensive, clear, and user-friendly.
Include specific commands for installation where possible.
"#
    )
}

/// One workflow
pub fn workflow_doc(workflow_json: &str) -> String {
    format!(
        r#"Generate comprehensive documentation for the following workflow:

Workflow: {workflow_json}

The documentation should include the following sections:
1. Overview and Purpose
2. Inputs and Prerequisites
3. Step-by-Step Guide
4. Expected Outputs
5. Performance Considerations
6. Common Issues and Solutions

Format the documentation in Markdown. Make it comprehensive, clear, and user-friendly.
Focus on helping users understand each step of the workflow and how to use it effectively.
"#
    )
}

/// One output file type
pub fn output_doc(file_type: &str, files_json: &str) -> String {
    format!(
        r#"Generate comprehensive documentation for the following output file type:

File Type: {file_type}
Files: {files_json}

The documentation should include the following sections:
1. Overview and Purpose
2. File Format and Structure
3. Column/Field Descriptions
4. Interpretation Guide
5. Examples of Use
6. Related Files

Format the documentation in Markdown. Make it comprehensive, clear, and user-friendly.
Focus on helping users understand what information is in these files and how to use it.
"#
    )
}

/// Scaling guide
pub fn scaling_guide(repo_name: &str, scaling_json: &str, bottlenecks_json: &str) -> String {
    format!(
        r#"Generate a comprehensive scaling guide for the following repository:

Repository Name: {repo_name}
Scaling Limitations: {scaling_json}
Bottlenecks: {bottlenecks_json}

The scaling guide should include the following sections:
1. Overview of Scaling Challenges
2. Data Size Considerations
3. Memory Management
4. Processing Time Optimization
5. Chunking Strategies
6. Parallelization Options
7. Hardware Recommendations
8. Monitoring and Optimization

Format the guide in Markdown. Make it comprehensive, clear, and user-friendly.
Focus on helping users scale the software to handle larger datasets efficiently.
"#
    )
}

/// Troubleshooting guide
pub fn troubleshooting_guide(repo_name: &str, failures_json: &str) -> String {
    format!(
        r#"Generate a comprehensive troubleshooting guide for the following repository:

Repository Name: {repo_name}
Potential Failure Points: {failures_json}

The troubleshooting guide should include the following sections:
1. Common Issues and Solutions
2. Error Message Interpretation
3. Debugging Strategies
4. Log File Analysis
5. Performance Troubleshooting
6. Installation Issues
7. Data Format Problems
8. Getting Help

Format the guide in Markdown. Make it comprehensive, clear, and user-friendly.
Focus on helping users diagnose and resolve common issues.
"#
    )
}

/// One source file
pub fn code_doc(path: &str, category: &str, content: &str) -> String {
    format!(
        r#"Generate comprehensive documentation for the following code file:

File: {path}
Type: {category}

```
{content}
```

The documentation should include the following sections:
1. Overview and Purpose
2. Functions and Classes
3. Parameters and Return Values
4. Dependencies
5. Usage Examples
6. Notes and Limitations

Format the documentation in Markdown. Focus on helping users understand what the code does and how to use it.
"#
    )
}
