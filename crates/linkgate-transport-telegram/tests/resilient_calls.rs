//! Callback answers and caption edits against a local Bot API stub

use linkgate_transport_telegram::bot::resilient::{
    answer_callback_resilient, edit_caption_resilient,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use teloxide::types::{CallbackQueryId, ChatId, MessageId};
use teloxide::{ApiError, Bot, RequestError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const NOT_MODIFIED: &str = "{\"ok\":false,\"error_code\":400,\"description\":\"Bad Request: message is not modified: specified new message content and reply markup are exactly the same as a current content and reply markup of the message\"}";

async fn read_request(socket: &mut TcpStream) {
    let mut buf = vec![0_u8; 16 * 1024];
    let mut read = 0;
    while let Ok(n) = socket.read(&mut buf[read..]).await {
        if n == 0 {
            break;
        }
        read += n;
        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
            break;
        }
    }
}

/// Serves one connection per scripted reply. `None` drops the connection
/// without answering.
async fn bot_api_stub(script: Vec<Option<(&'static str, &'static str)>>) -> (Bot, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        for reply in script {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request(&mut socket).await;
            counter.fetch_add(1, Ordering::SeqCst);

            let Some((status, body)) = reply else {
                drop(socket);
                continue;
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    let api_url = url::Url::parse(&format!("http://{addr}/")).expect("stub url");
    let bot = Bot::new("123456:TEST").set_api_url(api_url);
    (bot, hits)
}

#[tokio::test]
async fn test_callback_answer_retried_after_dropped_connection() {
    let (bot, hits) = bot_api_stub(vec![
        None,
        Some(("200 OK", "{\"ok\":true,\"result\":true}")),
    ])
    .await;
    let callback_id = CallbackQueryId("4242".to_string());

    let result = answer_callback_resilient(&bot, &callback_id, Some("Подписка не найдена"), true).await;

    assert!(result.is_ok(), "unexpected error: {result:?}");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_caption_not_modified_is_not_retried() {
    let (bot, hits) = bot_api_stub(vec![Some(("400 Bad Request", NOT_MODIFIED))]).await;

    let result = edit_caption_resilient(&bot, ChatId(1001), MessageId(7), "same caption").await;

    assert!(matches!(
        result,
        Err(RequestError::Api(ApiError::MessageNotModified))
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
