use tutor_chat_stream::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let client = StreamingChatClient::from_env()?;

    let mut stream = client
        .chat()
        .system_prompt("You are a Mathematics tutor. Please explain your solutions step by step.")
        .user_text("Solve 2x + 3 = 11.")
        .start_stream()
        .await?;

    while let Some(event) = stream.next_event().await {
        match event {
            ChatEvent::Delta { text, .. } => print!("{text}"),
            ChatEvent::Completed { .. } => println!(),
            ChatEvent::Failed { error, .. } => eprintln!("chat error: {error}"),
            ChatEvent::Started { .. } => {}
        }
    }

    let _ = stream.finish().await?;
    Ok(())
}
