//! Image-derived math chat: the captured problem image is summarized as a
//! textual placeholder in the conversation, with a lower sampling
//! temperature for deterministic worked solutions.
use tutor_chat_stream::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let client = StreamingChatClient::from_env()?;

    let text = client
        .chat()
        .system_prompt(
            "You are a math tutor. The user scanned a homework problem. \
             Analyze it and provide a detailed step-by-step explanation.",
        )
        .user_image_placeholder()
        .user_text("This image contains a math problem. Please analyze and provide a detailed explanation.")
        .temperature(0.2)
        .collect_text()
        .await?;

    println!("{text}");
    Ok(())
}
