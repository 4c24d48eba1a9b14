use shared::domain::{Offer, OfferId};

/// Campaigns shown before the operator creates or imports any.
pub fn default_offers() -> Vec<Offer> {
    vec![
        Offer {
            id: OfferId::new("1"),
            course: "Medicina".into(),
            headline: "O Futuro da Medicina Começa Aqui".into(),
            subtitle: "Laboratórios de ponta e hospital escola próprio.".into(),
            discount: "Bolsas de até 100%".into(),
            cta_text: "Inscreva-se Agora".into(),
            color_from: "from-blue-900".into(),
            color_to: "to-blue-600".into(),
            image: Some("https://placehold.co/300x500/png?text=Medico+Recortado".into()),
        },
        Offer {
            id: OfferId::new("2"),
            course: "Direito".into(),
            headline: "Defenda Seus Ideais".into(),
            subtitle: "Corpo docente formado por mestres e doutores.".into(),
            discount: "50% de Desconto".into(),
            cta_text: "Quero Minha Vaga".into(),
            color_from: "from-red-900".into(),
            color_to: "to-red-700".into(),
            image: Some("https://placehold.co/300x500/png?text=Advogada+Recortada".into()),
        },
        Offer {
            id: OfferId::new("3"),
            course: "Engenharia de Software".into(),
            headline: "Programe o Mundo".into(),
            subtitle: "Alta empregabilidade e parcerias com big techs.".into(),
            discount: "Matrícula Grátis".into(),
            cta_text: "Saiba Mais".into(),
            color_from: "from-emerald-900".into(),
            color_to: "to-emerald-600".into(),
            image: Some("https://placehold.co/300x500/png?text=Dev+Recortado".into()),
        },
    ]
}
