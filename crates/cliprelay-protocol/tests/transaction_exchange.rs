//! Integration test: a clipboard transaction crossing from a viewer to a
//! remote session over an in-memory stream.

use cliprelay_clipboard::mock::MockClipboard;
use cliprelay_clipboard::ClipboardProvider;
use cliprelay_protocol::transaction::{into_transaction, offer, respond};
use cliprelay_protocol::{MessageReceiver, MessageSender};
use cliprelay_types::{ClipboardContent, ClipboardFormat, ClipboardMessage};

const MAX: usize = 1024 * 1024;

#[tokio::test]
async fn copy_on_viewer_paste_on_host() {
    let (viewer_io, host_io) = tokio::io::duplex(64 * 1024);
    let (viewer_read, viewer_write) = tokio::io::split(viewer_io);
    let (host_read, host_write) = tokio::io::split(host_io);

    // Viewer: the local clipboard offers a file list, then plain text.
    let viewer_clipboard = MockClipboard::new(vec![], MAX);
    viewer_clipboard.handle().copy(vec![
        ClipboardContent::FileList(vec!["/home/user/notes.txt".to_string()]),
        ClipboardContent::text("notes"),
        ClipboardContent::html("<p>notes</p>"),
    ]);

    let viewer = tokio::spawn(async move {
        let mut tx = MessageSender::new(viewer_write);
        let mut rx = MessageReceiver::new(viewer_read);

        let mut transaction = viewer_clipboard.read().await.unwrap();
        tx.send(&offer(&mut transaction)).await.unwrap();

        let request: ClipboardMessage = rx.recv().await.unwrap().unwrap();
        let ClipboardMessage::Request { formats, .. } = request else {
            panic!("expected Request, got {request:?}");
        };
        tx.send(&respond(&mut transaction, &formats)).await.unwrap();
        tx.finish().await.unwrap();
    });

    // Host: can apply HTML or plain text, but not file lists.
    let mut host_clipboard =
        MockClipboard::new(vec![ClipboardFormat::Html, ClipboardFormat::PlainText], MAX);
    let host = host_clipboard.handle();

    let mut tx = MessageSender::new(host_write);
    let mut rx = MessageReceiver::new(host_read);

    let offered: ClipboardMessage = rx.recv().await.unwrap().unwrap();
    let ClipboardMessage::Offer {
        transaction,
        formats,
        ..
    } = offered
    else {
        panic!("expected Offer, got {offered:?}");
    };
    assert_eq!(
        formats,
        vec![
            ClipboardFormat::FileList,
            ClipboardFormat::PlainText,
            ClipboardFormat::Html
        ]
    );

    tx.send(&ClipboardMessage::Request {
        transaction,
        formats: vec![ClipboardFormat::Html, ClipboardFormat::PlainText],
    })
    .await
    .unwrap();

    let data: ClipboardMessage = rx.recv().await.unwrap().unwrap();
    let received = into_transaction(data).unwrap();
    assert_eq!(received.id(), transaction);
    assert_eq!(received.len(), 2);

    host_clipboard.write(received).await.unwrap();
    viewer.await.unwrap();

    // The viewer preferred plain text over HTML, so the host applies text.
    let applied = host.applied();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].transaction, transaction);
    assert_eq!(applied[0].content, ClipboardContent::text("notes"));
}

#[tokio::test]
async fn empty_answer_yields_empty_transaction() {
    let (client, server) = tokio::io::duplex(4096);
    let mut sender = MessageSender::new(client);
    let mut receiver = MessageReceiver::new(server);

    let mut transaction = cliprelay_types::ClipboardTransaction::init();
    transaction
        .add_content(ClipboardContent::Bitmap(vec![0; 32]))
        .unwrap();
    sender
        .send(&respond(&mut transaction, &[ClipboardFormat::PlainText]))
        .await
        .unwrap();

    let msg: ClipboardMessage = receiver.recv().await.unwrap().unwrap();
    let received = into_transaction(msg).unwrap();
    assert_eq!(received.id(), transaction.id());
    assert!(received.is_empty());

    // Writing an empty transaction leaves the host clipboard alone.
    let mut host = MockClipboard::new(vec![ClipboardFormat::PlainText], MAX);
    host.write(received).await.unwrap();
    assert!(host.handle().applied().is_empty());
}
