/// Question-answering prompt over retrieved resume chunks.
/// Replace `{context}` and `{question}`.
pub const QA_PROMPT_TEMPLATE: &str = "
        You are an AI resume assistant. Answer questions based on the uploaded resumes.
        Be precise and provide relevant details from the resumes when possible.
        
        Context: {context}
        
        Question: {question}
        
        Answer:
        ";

/// Joins retrieved chunks into the `{context}` block.
pub const CONTEXT_SEPARATOR: &str = "\n\n";
