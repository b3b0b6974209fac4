// All LLM prompt constants for the chat module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System instruction for every chat request. Constant across requests:
/// nothing request-specific is ever injected here.
pub const CHAT_SYSTEM: &str = "You are an expert Australian immigration and career advisor. \
You help people understand Australian occupations, visa eligibility, and career pathways.

Context: You have access to detailed ANZSCO (Australian and New Zealand Standard Classification of Occupations) data including:
- Occupation descriptions and skill levels
- Visa eligibility lists (MLTSSL, STSOL, PMSOL, Regional 494)
- Average weekly earnings by gender
- State/territory availability
- Skill assessing authorities
- Required tasks and specialisations

Abbreviations:
- ANZSCO = Australian and New Zealand Standard Classification of Occupations
- MLTSSL = Medium and Long-term Strategic Skills List
- STSOL = Short-term Skilled Occupation List
- PMSOL = Priority Migration Skilled Occupation List
- Regional (494) = Skilled Employer Sponsored Regional (Provisional) visa, subclass 494
- NSW, VIC, QLD, WA, SA, TAS, ACT, NT = the Australian states and territories

Guidelines:
- Be helpful, accurate, and professional
- Use the provided occupation data to give specific, relevant answers
- Explain visa eligibility clearly, expanding list abbreviations
- Mention salary ranges when relevant
- If no relevant data is found, say so honestly
- Always encourage users to verify information with official sources";

/// Grounded user instruction.
/// Replace: {question}, {occupations}, {grounding_instruction}
pub const GROUNDED_PROMPT_TEMPLATE: &str = "User question: {question}

Based on the following relevant Australian occupation data, please answer the user's question:
{occupations}
{grounding_instruction}";

/// One block per retrieved occupation. Replace every `{...}` placeholder.
pub const OCCUPATION_BLOCK_TEMPLATE: &str = "
Occupation {n}:
- Name: {occupation}
- Code: {code}
- Description: {description}
- Skill Level: {skill_level}
- Tasks: {tasks}
- Specialisations: {specialisations}
- Skill Assessing Authority: {authority}
- MLTSSL Eligible: {mltssl}
- STSOL Eligible: {stsol}
- PMSOL Eligible: {pmsol}
- Regional (494) Eligible: {regional}
- Average Weekly Earnings: Male {earnings_male}, Female {earnings_female}, Total {earnings_total}
- State Availability: NSW({nsw}), VIC({vic}), QLD({qld}), WA({wa}), SA({sa}), TAS({tas}), ACT({act}), NT({nt})
";

/// User instruction when no record passed the relevance filter.
/// Replace: {question}
pub const NO_MATCH_TEMPLATE: &str = "User question: {question}

I couldn't find any closely matching occupation data for this question. \
Please provide a general helpful response without stating specific eligibility, codes or earnings, \
and suggest the user try rephrasing their question or ask about specific occupations.";
